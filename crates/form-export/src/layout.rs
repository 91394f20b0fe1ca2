//! Field layout of the printed membership form.
//!
//! Positions were measured on a fixed design canvas of
//! [`REFERENCE_WIDTH`] x [`REFERENCE_HEIGHT`] pixels and are stored as
//! fractions of it, so the same table places text correctly on a template
//! rendered at any size. The `y` of every field is the text baseline.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Width of the design canvas the coordinates were authored on.
pub const REFERENCE_WIDTH: f64 = 816.0;

/// Height of the design canvas the coordinates were authored on.
pub const REFERENCE_HEIGHT: f64 = 1184.0;

/// Every position on the form that can receive text or a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    MemberId,
    ApplicationDate,
    FullName,
    BirthDate,
    Age,
    PlaceOfBirth,
    Address,
    Phone,
    Email,
    MaritalSingle,
    MaritalMarried,
    MaritalWidowed,
    MaritalDivorce,
    MaritalOthers,
    MaritalOtherText,
    GenderMale,
    GenderFemale,
    GenderOther,
    GenderOtherText,
    Employer,
    EmployerAddress,
    Position,
    DateHired,
    UnionRole,
    LocalChapter,
    EmergencyName,
    EmergencyRelationship,
    EmergencyPhone,
    EmergencyAddress,
    PrintedName,
    DateSigned,
}

/// A field position as fractions of the reference canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldCoordinate {
    /// Left edge of the text, fraction of width.
    pub x: f64,
    /// Baseline, fraction of height.
    pub y: f64,
    /// Wrap width, fraction of width. `None` means no wrapping.
    pub width: Option<f64>,
}

/// Design-canvas position in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignBox {
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
}

const fn at(x: f64, y: f64) -> DesignBox {
    DesignBox { x, y, width: None }
}

const fn wrapped(x: f64, y: f64, width: f64) -> DesignBox {
    DesignBox {
        x,
        y,
        width: Some(width),
    }
}

impl FormField {
    pub const ALL: [FormField; 31] = [
        FormField::MemberId,
        FormField::ApplicationDate,
        FormField::FullName,
        FormField::BirthDate,
        FormField::Age,
        FormField::PlaceOfBirth,
        FormField::Address,
        FormField::Phone,
        FormField::Email,
        FormField::MaritalSingle,
        FormField::MaritalMarried,
        FormField::MaritalWidowed,
        FormField::MaritalDivorce,
        FormField::MaritalOthers,
        FormField::MaritalOtherText,
        FormField::GenderMale,
        FormField::GenderFemale,
        FormField::GenderOther,
        FormField::GenderOtherText,
        FormField::Employer,
        FormField::EmployerAddress,
        FormField::Position,
        FormField::DateHired,
        FormField::UnionRole,
        FormField::LocalChapter,
        FormField::EmergencyName,
        FormField::EmergencyRelationship,
        FormField::EmergencyPhone,
        FormField::EmergencyAddress,
        FormField::PrintedName,
        FormField::DateSigned,
    ];

    /// Pixel position on the design canvas.
    pub fn design_box(&self) -> DesignBox {
        match self {
            FormField::MemberId => wrapped(600.0, 128.0, 176.0),
            FormField::ApplicationDate => wrapped(600.0, 156.0, 176.0),
            FormField::FullName => wrapped(150.0, 238.0, 626.0),
            FormField::BirthDate => wrapped(150.0, 282.0, 170.0),
            FormField::Age => at(392.0, 282.0),
            FormField::PlaceOfBirth => wrapped(520.0, 282.0, 256.0),
            FormField::Address => wrapped(150.0, 326.0, 626.0),
            FormField::Phone => wrapped(150.0, 370.0, 250.0),
            FormField::Email => wrapped(470.0, 370.0, 306.0),
            FormField::MaritalSingle => at(156.0, 418.0),
            FormField::MaritalMarried => at(256.0, 418.0),
            FormField::MaritalWidowed => at(356.0, 418.0),
            FormField::MaritalDivorce => at(456.0, 418.0),
            FormField::MaritalOthers => at(556.0, 418.0),
            FormField::MaritalOtherText => wrapped(640.0, 418.0, 136.0),
            FormField::GenderMale => at(156.0, 458.0),
            FormField::GenderFemale => at(256.0, 458.0),
            FormField::GenderOther => at(356.0, 458.0),
            FormField::GenderOtherText => wrapped(440.0, 458.0, 200.0),
            FormField::Employer => wrapped(150.0, 530.0, 626.0),
            FormField::EmployerAddress => wrapped(150.0, 574.0, 626.0),
            FormField::Position => wrapped(150.0, 618.0, 280.0),
            FormField::DateHired => wrapped(560.0, 618.0, 216.0),
            FormField::UnionRole => wrapped(150.0, 662.0, 280.0),
            FormField::LocalChapter => wrapped(560.0, 662.0, 216.0),
            FormField::EmergencyName => wrapped(150.0, 750.0, 330.0),
            FormField::EmergencyRelationship => wrapped(600.0, 750.0, 176.0),
            FormField::EmergencyPhone => wrapped(150.0, 794.0, 250.0),
            FormField::EmergencyAddress => wrapped(150.0, 838.0, 626.0),
            FormField::PrintedName => wrapped(120.0, 1060.0, 300.0),
            FormField::DateSigned => wrapped(540.0, 1060.0, 200.0),
        }
    }

    /// Stable key used in CLI output and JSON.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::MemberId => "member_id",
            FormField::ApplicationDate => "application_date",
            FormField::FullName => "full_name",
            FormField::BirthDate => "birth_date",
            FormField::Age => "age",
            FormField::PlaceOfBirth => "place_of_birth",
            FormField::Address => "address",
            FormField::Phone => "phone",
            FormField::Email => "email",
            FormField::MaritalSingle => "marital_single",
            FormField::MaritalMarried => "marital_married",
            FormField::MaritalWidowed => "marital_widowed",
            FormField::MaritalDivorce => "marital_divorce",
            FormField::MaritalOthers => "marital_others",
            FormField::MaritalOtherText => "marital_other_text",
            FormField::GenderMale => "gender_male",
            FormField::GenderFemale => "gender_female",
            FormField::GenderOther => "gender_other",
            FormField::GenderOtherText => "gender_other_text",
            FormField::Employer => "employer",
            FormField::EmployerAddress => "employer_address",
            FormField::Position => "position",
            FormField::DateHired => "date_hired",
            FormField::UnionRole => "union_role",
            FormField::LocalChapter => "local_chapter",
            FormField::EmergencyName => "emergency_name",
            FormField::EmergencyRelationship => "emergency_relationship",
            FormField::EmergencyPhone => "emergency_phone",
            FormField::EmergencyAddress => "emergency_address",
            FormField::PrintedName => "printed_name",
            FormField::DateSigned => "date_signed",
        }
    }

    /// Whether this field receives a check mark rather than text.
    pub fn is_checkbox(&self) -> bool {
        matches!(
            self,
            FormField::MaritalSingle
                | FormField::MaritalMarried
                | FormField::MaritalWidowed
                | FormField::MaritalDivorce
                | FormField::MaritalOthers
                | FormField::GenderMale
                | FormField::GenderFemale
                | FormField::GenderOther
        )
    }

    /// Fractional coordinate of this field.
    pub fn coordinate(&self) -> FieldCoordinate {
        COORDINATES[self]
    }
}

/// Computed once from the design table.
static COORDINATES: Lazy<BTreeMap<FormField, FieldCoordinate>> = Lazy::new(|| {
    FormField::ALL
        .iter()
        .map(|field| {
            let b = field.design_box();
            let coordinate = FieldCoordinate {
                x: b.x / REFERENCE_WIDTH,
                y: b.y / REFERENCE_HEIGHT,
                width: b.width.map(|w| w / REFERENCE_WIDTH),
            };
            (*field, coordinate)
        })
        .collect()
});

/// All fields with their fractional coordinates, in form order.
pub fn coordinates() -> impl Iterator<Item = (FormField, FieldCoordinate)> {
    COORDINATES.iter().map(|(field, coord)| (*field, *coord))
}

/// Marital status checkbox group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalBucket {
    Single,
    Married,
    Widowed,
    Divorce,
    Others,
}

/// Gender checkbox group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderBucket {
    Male,
    Female,
    Other,
}

/// Lowercase prefixes, checked in order.
const MARITAL_PREFIXES: &[(&str, MaritalBucket)] = &[
    ("sing", MaritalBucket::Single),
    ("mar", MaritalBucket::Married),
    ("wid", MaritalBucket::Widowed),
    ("div", MaritalBucket::Divorce),
    ("sep", MaritalBucket::Divorce),
];

/// Lowercase prefixes, checked in order.
const GENDER_PREFIXES: &[(&str, GenderBucket)] = &[
    ("fe", GenderBucket::Female),
    ("f", GenderBucket::Female),
    ("wom", GenderBucket::Female),
    ("ma", GenderBucket::Male),
    ("m", GenderBucket::Male),
];

/// Values that pick the catch-all box without needing overflow text.
const CATCH_ALL_WORDS: &[&str] = &["other", "others"];

/// Outcome of mapping a free-text answer onto a checkbox group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxChoice<B> {
    pub bucket: B,
    /// Text written next to the catch-all box for unrecognized answers.
    pub overflow: Option<String>,
}

fn classify<B: Copy>(
    value: &str,
    prefixes: &[(&str, B)],
    catch_all: B,
) -> Option<CheckboxChoice<B>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let lower = value.to_lowercase();
    if let Some((_, bucket)) = prefixes.iter().find(|(p, _)| lower.starts_with(p)) {
        return Some(CheckboxChoice {
            bucket: *bucket,
            overflow: None,
        });
    }

    let overflow = if CATCH_ALL_WORDS.contains(&lower.as_str()) {
        None
    } else {
        Some(value.to_string())
    };
    Some(CheckboxChoice {
        bucket: catch_all,
        overflow,
    })
}

impl MaritalBucket {
    /// Map a normalized marital status answer. Empty answers select nothing.
    pub fn classify(value: &str) -> Option<CheckboxChoice<MaritalBucket>> {
        classify(value, MARITAL_PREFIXES, MaritalBucket::Others)
    }

    pub fn checkbox(&self) -> FormField {
        match self {
            MaritalBucket::Single => FormField::MaritalSingle,
            MaritalBucket::Married => FormField::MaritalMarried,
            MaritalBucket::Widowed => FormField::MaritalWidowed,
            MaritalBucket::Divorce => FormField::MaritalDivorce,
            MaritalBucket::Others => FormField::MaritalOthers,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalBucket::Single => "single",
            MaritalBucket::Married => "married",
            MaritalBucket::Widowed => "widowed",
            MaritalBucket::Divorce => "divorce",
            MaritalBucket::Others => "others",
        }
    }
}

impl GenderBucket {
    /// Map a normalized gender answer. Empty answers select nothing.
    pub fn classify(value: &str) -> Option<CheckboxChoice<GenderBucket>> {
        classify(value, GENDER_PREFIXES, GenderBucket::Other)
    }

    pub fn checkbox(&self) -> FormField {
        match self {
            GenderBucket::Male => FormField::GenderMale,
            GenderBucket::Female => FormField::GenderFemale,
            GenderBucket::Other => FormField::GenderOther,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenderBucket::Male => "male",
            GenderBucket::Female => "female",
            GenderBucket::Other => "other",
        }
    }
}
