//! Member record to form entries.

use chrono::NaiveDate;
use unionportal_common::clock::iso_date;
use unionportal_member_model::{age_on, normalize, MemberRecord};

use crate::layout::{FormField, GenderBucket, MaritalBucket};

/// One thing to put on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEntry {
    Text { field: FormField, value: String },
    Check { field: FormField },
}

impl FieldEntry {
    pub fn field(&self) -> FormField {
        match self {
            FieldEntry::Text { field, .. } | FieldEntry::Check { field } => *field,
        }
    }
}

/// Collect the entries for `member`, skipping empty values.
///
/// `today` supplies the age reference and the default application date.
pub fn collect_entries(member: &MemberRecord, today: NaiveDate) -> Vec<FieldEntry> {
    let mut entries = Vec::new();
    let mut text = |field: FormField, value: String| {
        if !value.is_empty() {
            entries.push(FieldEntry::Text { field, value });
        }
    };

    let full_name = member.full_name();
    let application_date = {
        let given = normalize(member.application_date.as_deref());
        if given.is_empty() {
            iso_date(today)
        } else {
            given
        }
    };
    let birth_date = normalize(member.birth_date.as_deref());
    let age = age_on(&birth_date, today)
        .map(|age| age.to_string())
        .unwrap_or_else(|| normalize(member.age.as_deref()));

    text(FormField::MemberId, member.member_id());
    text(FormField::ApplicationDate, application_date.clone());
    text(FormField::FullName, full_name.clone());
    text(FormField::BirthDate, birth_date);
    text(FormField::Age, age);
    text(FormField::PlaceOfBirth, normalize(member.place_of_birth.as_deref()));
    text(FormField::Address, normalize(member.address.as_deref()));
    text(FormField::Phone, normalize(member.phone.as_deref()));
    text(FormField::Email, normalize(member.email.as_deref()));

    let marital = MaritalBucket::classify(&normalize(member.marital_status.as_deref()));
    if let Some(overflow) = marital.as_ref().and_then(|c| c.overflow.clone()) {
        text(FormField::MaritalOtherText, overflow);
    }
    let gender = GenderBucket::classify(&normalize(member.gender.as_deref()));
    if let Some(overflow) = gender.as_ref().and_then(|c| c.overflow.clone()) {
        text(FormField::GenderOtherText, overflow);
    }

    text(FormField::Employer, normalize(member.employer.as_deref()));
    text(
        FormField::EmployerAddress,
        normalize(member.employer_address.as_deref()),
    );
    text(FormField::Position, normalize(member.position.as_deref()));
    text(FormField::DateHired, normalize(member.date_hired.as_deref()));
    text(FormField::UnionRole, normalize(member.union_role.as_deref()));
    text(FormField::LocalChapter, normalize(member.local_chapter.as_deref()));

    let contact = &member.emergency_contact;
    text(FormField::EmergencyName, normalize(contact.name.as_deref()));
    text(
        FormField::EmergencyRelationship,
        normalize(contact.relationship.as_deref()),
    );
    text(FormField::EmergencyPhone, normalize(contact.phone.as_deref()));
    text(FormField::EmergencyAddress, normalize(contact.address.as_deref()));

    text(FormField::PrintedName, full_name);
    text(FormField::DateSigned, application_date);

    if let Some(choice) = marital {
        entries.push(FieldEntry::Check {
            field: choice.bucket.checkbox(),
        });
    }
    if let Some(choice) = gender {
        entries.push(FieldEntry::Check {
            field: choice.bucket.checkbox(),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use unionportal_member_model::EmergencyContact;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn text_of(entries: &[FieldEntry], field: FormField) -> Option<&str> {
        entries.iter().find_map(|e| match e {
            FieldEntry::Text { field: f, value } if *f == field => Some(value.as_str()),
            _ => None,
        })
    }

    fn is_checked(entries: &[FieldEntry], field: FormField) -> bool {
        entries
            .iter()
            .any(|e| matches!(e, FieldEntry::Check { field: f } if *f == field))
    }

    #[test]
    fn test_empty_member_only_gets_dates() {
        let entries = collect_entries(&MemberRecord::default(), today());
        let fields: Vec<_> = entries.iter().map(FieldEntry::field).collect();
        assert_eq!(
            fields,
            vec![FormField::ApplicationDate, FormField::DateSigned]
        );
        assert_eq!(text_of(&entries, FormField::DateSigned), Some("2025-06-15"));
    }

    #[test]
    fn test_values_are_normalized_and_derived() {
        let member = MemberRecord {
            member_id: Some(" ALU-001 ".to_string()),
            first_name: Some("Maria".to_string()),
            last_name: Some("  Santos".to_string()),
            birth_date: Some("1990-07-01".to_string()),
            address: Some("12  Mabini St.\nQuezon City".to_string()),
            application_date: Some("2025-06-01".to_string()),
            ..MemberRecord::default()
        };
        let entries = collect_entries(&member, today());

        assert_eq!(text_of(&entries, FormField::MemberId), Some("ALU-001"));
        assert_eq!(text_of(&entries, FormField::FullName), Some("Maria Santos"));
        assert_eq!(text_of(&entries, FormField::PrintedName), Some("Maria Santos"));
        assert_eq!(text_of(&entries, FormField::Age), Some("34"));
        assert_eq!(
            text_of(&entries, FormField::Address),
            Some("12 Mabini St. Quezon City")
        );
        assert_eq!(text_of(&entries, FormField::DateSigned), Some("2025-06-01"));
    }

    #[test]
    fn test_falsy_json_values_are_not_drawn() {
        let member = MemberRecord::from_value(&serde_json::json!({
            "firstName": "Ana",
            "employer": false,
            "localChapter": 0
        }));
        let entries = collect_entries(&member, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        assert_eq!(text_of(&entries, FormField::FullName), Some("Ana"));
        assert!(text_of(&entries, FormField::Employer).is_none());
        assert!(text_of(&entries, FormField::LocalChapter).is_none());
    }

    #[test]
    fn test_explicit_age_used_when_birth_date_unparsable() {
        let member = MemberRecord {
            birth_date: Some("sometime in 1980".to_string()),
            age: Some("45".to_string()),
            ..MemberRecord::default()
        };
        let entries = collect_entries(&member, today());
        assert_eq!(text_of(&entries, FormField::Age), Some("45"));
    }

    #[test]
    fn test_checkbox_groups() {
        let member = MemberRecord {
            marital_status: Some("Separated".to_string()),
            gender: Some("Non-binary".to_string()),
            ..MemberRecord::default()
        };
        let entries = collect_entries(&member, today());

        assert!(is_checked(&entries, FormField::MaritalDivorce));
        assert!(text_of(&entries, FormField::MaritalOtherText).is_none());
        assert!(is_checked(&entries, FormField::GenderOther));
        assert_eq!(
            text_of(&entries, FormField::GenderOtherText),
            Some("Non-binary")
        );
        let checks = entries
            .iter()
            .filter(|e| matches!(e, FieldEntry::Check { .. }))
            .count();
        assert_eq!(checks, 2);
    }

    #[test]
    fn test_emergency_contact_fields() {
        let member = MemberRecord {
            emergency_contact: EmergencyContact {
                name: Some("Jose Santos".to_string()),
                relationship: Some("Spouse".to_string()),
                phone: Some("0917 123 4567".to_string()),
                address: None,
            },
            ..MemberRecord::default()
        };
        let entries = collect_entries(&member, today());
        assert_eq!(text_of(&entries, FormField::EmergencyName), Some("Jose Santos"));
        assert_eq!(
            text_of(&entries, FormField::EmergencyRelationship),
            Some("Spouse")
        );
        assert!(text_of(&entries, FormField::EmergencyAddress).is_none());
    }
}
