//! Show how a member record will be read and exported.

use std::path::PathBuf;

use anyhow::Context;
use unionportal_common::PortalError;
use unionportal_common::clock::{Clock, SystemClock};
use unionportal_form_export::export_filename;
use unionportal_form_export::layout::{GenderBucket, MaritalBucket};
use unionportal_member_model::{age_on, normalize, MemberRecord};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating member record at: {}", path.display());

    let member = MemberRecord::load(&path)
        .map_err(PortalError::from)
        .context("Failed to load member record")?;
    let today = SystemClock.today();

    let show = |label: &str, value: String| {
        if value.is_empty() {
            println!("  {label}: -");
        } else {
            println!("  {label}: {value}");
        }
    };

    show("Member ID", member.member_id());
    show("Name", member.full_name());
    println!("  Status: {}", member.status.label());

    let birth_date = normalize(member.birth_date.as_deref());
    match age_on(&birth_date, today) {
        Some(age) => println!("  Age: {age} (from birth date {birth_date})"),
        None if !birth_date.is_empty() => {
            println!("  Age: cannot parse birth date \"{birth_date}\"");
        }
        None => show("Age", normalize(member.age.as_deref())),
    }

    let marital = normalize(member.marital_status.as_deref());
    match MaritalBucket::classify(&marital) {
        Some(choice) => println!(
            "  Civil status: {} -> [{}]{}",
            marital,
            choice.bucket.as_str(),
            choice
                .overflow
                .map(|text| format!(" + \"{text}\""))
                .unwrap_or_default()
        ),
        None => println!("  Civil status: -"),
    }

    let gender = normalize(member.gender.as_deref());
    match GenderBucket::classify(&gender) {
        Some(choice) => println!(
            "  Gender: {} -> [{}]{}",
            gender,
            choice.bucket.as_str(),
            choice
                .overflow
                .map(|text| format!(" + \"{text}\""))
                .unwrap_or_default()
        ),
        None => println!("  Gender: -"),
    }

    show("Employer", normalize(member.employer.as_deref()));
    show("Union role", normalize(member.union_role.as_deref()));

    if member.emergency_contact.is_empty() {
        println!("  Emergency contact: -");
    } else {
        show(
            "Emergency contact",
            normalize(member.emergency_contact.name.as_deref()),
        );
    }

    println!("\nOutput file: {}", export_filename(&member, today));

    Ok(())
}
