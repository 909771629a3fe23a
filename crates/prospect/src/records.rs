//! People and company records, and deterministic sample data.
//!
//! The generators cycle through small fixed pools, so the same `n` always
//! yields the same rows. People work at the first four companies of the
//! company pool, which makes "how many rows match X" easy to reason about
//! in tests: every fourth person (index 1, 5, 9, ...) works at
//! "Brightline Tech".

use prospect_core::{Item, RevealField};
use prospect_widgets::{Column, Row};
use ratatui::layout::Constraint;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Chen", "Dana", "Elif", "Farah", "Goran", "Hana", "Ivan", "Jonas", "Kai",
    "Lena",
];

const LAST_NAMES: &[&str] = &[
    "Okafor",
    "Lindqvist",
    "Moreau",
    "Tanaka",
    "Novak",
    "Duarte",
    "Kowalski",
    "Haddad",
    "Brennan",
    "Sato",
];

const TITLES: &[&str] = &[
    "Head of Sales",
    "VP Marketing",
    "Founder",
    "Operations Lead",
    "Account Executive",
    "CFO",
    "Product Manager",
];

const CITIES: &[&str] = &[
    "Berlin", "Lisbon", "Austin", "Toronto", "Osaka", "Nairobi", "Denver",
];

const COMPANY_PREFIXES: &[&str] = &[
    "Acme",
    "Brightline",
    "Cobalt",
    "Delta",
    "Evergreen",
    "Fjord",
    "Granite",
    "Harbor",
];

/// (name suffix, industry)
const COMPANY_KINDS: &[(&str, &str)] = &[
    ("Logistics", "Logistics"),
    ("Tech", "Software"),
    ("Health", "Healthcare"),
    ("Foods", "Food & Beverage"),
    ("Capital", "Finance"),
    ("Energy", "Energy"),
    ("Labs", "Research"),
];

const SIZE_BANDS: &[&str] = &["1-10", "11-50", "51-200", "201-500", "501-1000", "1000+"];

/// Number of companies people are spread across.
const EMPLOYERS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub industry: String,
    pub size: String,
    pub location: String,
    pub domain: String,
    pub phone: String,
}

impl Item for Person {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Row for Person {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::text("Name", Constraint::Length(18)),
            Column::text("Title", Constraint::Length(18)),
            Column::text("Company", Constraint::Length(18)),
            Column::text("Location", Constraint::Length(10)),
            Column::contact("Email", Constraint::Min(16), RevealField::Email),
            Column::contact("Phone", Constraint::Length(16), RevealField::Phone),
        ];
        COLUMNS
    }

    fn cell(&self, index: usize) -> &str {
        match index {
            0 => &self.name,
            1 => &self.title,
            2 => &self.company,
            3 => &self.location,
            4 => &self.email,
            5 => &self.phone,
            _ => "",
        }
    }
}

impl Item for Company {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Row for Company {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::text("Company", Constraint::Length(20)),
            Column::text("Industry", Constraint::Length(16)),
            Column::text("Size", Constraint::Length(9)),
            Column::text("Location", Constraint::Length(10)),
            Column::text("Domain", Constraint::Min(16)),
            Column::contact("Phone", Constraint::Length(16), RevealField::Phone),
        ];
        COLUMNS
    }

    fn cell(&self, index: usize) -> &str {
        match index {
            0 => &self.name,
            1 => &self.industry,
            2 => &self.size,
            3 => &self.location,
            4 => &self.domain,
            5 => &self.phone,
            _ => "",
        }
    }
}

fn company_name(i: usize) -> String {
    let prefix = COMPANY_PREFIXES[i % COMPANY_PREFIXES.len()];
    let (suffix, _) = COMPANY_KINDS[i % COMPANY_KINDS.len()];
    let cycle = COMPANY_PREFIXES.len() * COMPANY_KINDS.len();
    if i < cycle {
        format!("{prefix} {suffix}")
    } else {
        format!("{prefix} {suffix} {}", i / cycle + 1)
    }
}

fn domain_for(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("{slug}.com")
}

fn phone_for(i: usize) -> String {
    format!(
        "+1 {:03} {:03} {:04}",
        200 + i % 800,
        (i * 37) % 1000,
        (i * 7919) % 10000
    )
}

/// `n` people in a stable order.
pub fn people(n: usize) -> Vec<Person> {
    (0..n)
        .map(|i| {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES[(i / FIRST_NAMES.len() + i) % LAST_NAMES.len()];
            let company = company_name(i % EMPLOYERS);
            Person {
                id: i as u64 + 1,
                name: format!("{first} {last}"),
                title: TITLES[i % TITLES.len()].to_string(),
                email: format!(
                    "{}.{}{}@{}",
                    first.to_ascii_lowercase(),
                    last.to_ascii_lowercase(),
                    i,
                    domain_for(&company)
                ),
                company,
                location: CITIES[i % CITIES.len()].to_string(),
                phone: phone_for(i),
            }
        })
        .collect()
}

/// `n` companies in a stable order.
pub fn companies(n: usize) -> Vec<Company> {
    (0..n)
        .map(|i| {
            let name = company_name(i);
            Company {
                id: i as u64 + 1,
                industry: COMPANY_KINDS[i % COMPANY_KINDS.len()].1.to_string(),
                size: SIZE_BANDS[(i * 5) % SIZE_BANDS.len()].to_string(),
                location: CITIES[(i * 3) % CITIES.len()].to_string(),
                domain: domain_for(&name),
                phone: phone_for(i + 500),
                name,
            }
        })
        .collect()
}
