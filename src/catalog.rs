//! Player profile catalog: create, edit, delete, search and CSV import.

use crate::models::{PlayerProfile, ProfileId};
use chrono::Utc;
use serde::Deserialize;
use std::io::Read;
use uuid::Uuid;

/// Errors from catalog operations.
#[derive(Debug)]
pub enum CatalogError {
    /// Name is required.
    MissingName,
    /// Category is required.
    MissingCategory,
    /// Email was given but does not look like an address.
    InvalidEmail(String),
    ProfileNotFound(ProfileId),
    /// CSV could not be read (row number is 1-based, header excluded).
    Csv { row: usize, source: csv::Error },
    /// A CSV row failed validation.
    InvalidRow { row: usize, reason: Box<CatalogError> },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::MissingName => write!(f, "Name is required"),
            CatalogError::MissingCategory => write!(f, "Category is required"),
            CatalogError::InvalidEmail(email) => write!(f, "Invalid email: {}", email),
            CatalogError::ProfileNotFound(_) => write!(f, "Player profile not found"),
            CatalogError::Csv { row, source } => write!(f, "CSV error at row {}: {}", row, source),
            CatalogError::InvalidRow { row, reason } => write!(f, "Row {}: {}", row, reason),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Editable fields of a profile (form or CSV row).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id_number: String,
    pub category: String,
}

impl ProfileInput {
    /// Trimmed copy; name and category required, email checked when present.
    fn validated(&self) -> Result<ProfileInput, CatalogError> {
        let input = ProfileInput {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            id_number: self.id_number.trim().to_string(),
            category: self.category.trim().to_string(),
        };
        if input.name.is_empty() {
            return Err(CatalogError::MissingName);
        }
        if input.category.is_empty() {
            return Err(CatalogError::MissingCategory);
        }
        if !input.email.is_empty() && !looks_like_email(&input.email) {
            return Err(CatalogError::InvalidEmail(input.email));
        }
        Ok(input)
    }
}

/// `local@domain.tld`, no whitespace.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty() && !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}

/// All known player profiles.
#[derive(Clone, Debug, Default)]
pub struct ProfileCatalog {
    profiles: Vec<PlayerProfile>,
}

impl ProfileCatalog {
    pub fn new(profiles: Vec<PlayerProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[PlayerProfile] {
        &self.profiles
    }

    pub fn get(&self, id: ProfileId) -> Option<&PlayerProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn add(&mut self, input: &ProfileInput) -> Result<&PlayerProfile, CatalogError> {
        let input = input.validated()?;
        self.profiles.push(PlayerProfile {
            id: Uuid::new_v4(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            id_number: input.id_number,
            category: input.category,
            created_at: Utc::now(),
        });
        Ok(&self.profiles[self.profiles.len() - 1])
    }

    /// Replace the editable fields; id and creation time are kept.
    pub fn update(&mut self, id: ProfileId, input: &ProfileInput) -> Result<&PlayerProfile, CatalogError> {
        let input = input.validated()?;
        let profile = self
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::ProfileNotFound(id))?;
        profile.name = input.name;
        profile.phone = input.phone;
        profile.email = input.email;
        profile.id_number = input.id_number;
        profile.category = input.category;
        Ok(profile)
    }

    pub fn remove(&mut self, id: ProfileId) -> Result<PlayerProfile, CatalogError> {
        let idx = self
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::ProfileNotFound(id))?;
        Ok(self.profiles.remove(idx))
    }

    /// Profiles whose name or email contains `term` (case-insensitive), or whose
    /// phone or id number contains it, optionally limited to one category.
    pub fn search(&self, term: &str, category: Option<&str>) -> Vec<&PlayerProfile> {
        let term = term.trim();
        let lowered = term.to_lowercase();
        self.profiles
            .iter()
            .filter(|p| {
                term.is_empty()
                    || p.name.to_lowercase().contains(&lowered)
                    || p.email.to_lowercase().contains(&lowered)
                    || p.phone.contains(term)
                    || p.id_number.contains(term)
            })
            .filter(|p| match category {
                Some(c) if !c.is_empty() => p.category == c,
                _ => true,
            })
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        crate::logic::categories(&self.profiles)
    }

    /// Import profiles from CSV with header `name,phone,email,id_number,category`.
    /// All rows are validated before any is added. Returns the number added.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<usize, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut inputs = Vec::new();
        for (i, record) in rdr.deserialize::<ProfileInput>().enumerate() {
            let row = i + 1;
            let input = record.map_err(|source| CatalogError::Csv { row, source })?;
            input
                .validated()
                .map_err(|reason| CatalogError::InvalidRow {
                    row,
                    reason: Box::new(reason),
                })?;
            inputs.push(input);
        }
        for input in &inputs {
            self.add(input)?;
        }
        log::info!("Imported {} player profiles", inputs.len());
        Ok(inputs.len())
    }
}

impl From<ProfileCatalog> for Vec<PlayerProfile> {
    fn from(catalog: ProfileCatalog) -> Self {
        catalog.profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, category: &str) -> ProfileInput {
        ProfileInput {
            name: name.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    #[test]
    fn email_check() {
        assert!(looks_like_email("ana@club.es"));
        assert!(!looks_like_email("ana@club"));
        assert!(!looks_like_email("ana club@x.es"));
        assert!(!looks_like_email("@x.es"));
        assert!(!looks_like_email("a@b@c.es"));
    }

    #[test]
    fn add_trims_and_requires_name_and_category() {
        let mut catalog = ProfileCatalog::default();
        let added = catalog.add(&input("  Ana  ", " 3ra ")).unwrap();
        assert_eq!(added.name, "Ana");
        assert_eq!(added.category, "3ra");
        assert!(matches!(catalog.add(&input(" ", "3ra")), Err(CatalogError::MissingName)));
        assert!(matches!(catalog.add(&input("Bea", "")), Err(CatalogError::MissingCategory)));
        assert_eq!(catalog.profiles().len(), 1);
    }

    #[test]
    fn update_keeps_identity() {
        let mut catalog = ProfileCatalog::default();
        let (id, created_at) = {
            let p = catalog.add(&input("Ana", "3ra")).unwrap();
            (p.id, p.created_at)
        };
        let updated = catalog.update(id, &input("Ana María", "2da")).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.category, "2da");
    }

    #[test]
    fn search_by_text_and_category() {
        let mut catalog = ProfileCatalog::default();
        catalog
            .add(&ProfileInput {
                phone: "600111222".into(),
                email: "ana@club.es".into(),
                ..input("Ana", "3ra")
            })
            .unwrap();
        catalog.add(&input("Bea", "2da")).unwrap();
        catalog.add(&input("Ángel", "3ra")).unwrap();

        assert_eq!(catalog.search("ANA", None).len(), 1);
        assert_eq!(catalog.search("111", None).len(), 1);
        assert_eq!(catalog.search("club.ES", None).len(), 1);
        assert_eq!(catalog.search("", Some("3ra")).len(), 2);
        assert_eq!(catalog.search("bea", Some("3ra")).len(), 0);
        assert_eq!(catalog.categories(), vec!["2da".to_string(), "3ra".to_string()]);
    }

    #[test]
    fn csv_import_is_all_or_nothing() {
        let mut catalog = ProfileCatalog::default();
        let data = "name,phone,email,id_number,category\nAna,600,ana@club.es,X1,3ra\nBea,,,,2da\n";
        assert_eq!(catalog.import_csv(data.as_bytes()).unwrap(), 2);

        let bad = "name,phone,email,id_number,category\nCarla,,,,3ra\nDani,,not-an-email,,3ra\n";
        let err = catalog.import_csv(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRow { row: 2, .. }));
        assert_eq!(catalog.profiles().len(), 2);
    }
}
