//! Print the form coordinate table.

use unionportal_form_export::layout::{coordinates, REFERENCE_HEIGHT, REFERENCE_WIDTH};

pub fn run() -> anyhow::Result<()> {
    println!(
        "Form fields (reference canvas {}x{})",
        REFERENCE_WIDTH, REFERENCE_HEIGHT
    );
    println!("{}", "=".repeat(72));
    println!(
        "{:<24} {:>6} {:>6} {:>6}   {:>7} {:>7} {:>7}",
        "field", "x", "y", "width", "x", "y", "width"
    );

    for (field, coord) in coordinates() {
        let design = field.design_box();
        let kind = if field.is_checkbox() { " [ ]" } else { "" };
        println!(
            "{:<24} {:>6} {:>6} {:>6}   {:>7.4} {:>7.4} {:>7}{}",
            field.key(),
            design.x,
            design.y,
            design.width.map(|w| w.to_string()).unwrap_or_else(|| "-".into()),
            coord.x,
            coord.y,
            coord
                .width
                .map(|w| format!("{w:.4}"))
                .unwrap_or_else(|| "-".into()),
            kind
        );
    }

    Ok(())
}
