//! Check which template source loads.

use unionportal_common::config::AppConfig;
use unionportal_form_export::template::{describe_location, fallback_data_url, TemplateProvider};

pub async fn run(config: &AppConfig, template: Option<String>) -> anyhow::Result<()> {
    let location = template
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| config.portal.template_url(&config.export.template_path));

    println!("Union Portal Template Check");
    println!("{}", "=".repeat(50));
    println!("Primary: {}", describe_location(&location));

    let provider = TemplateProvider::new();
    match provider.load(&location).await {
        Ok(image) => {
            println!("[OK] Primary template: {}x{}", image.width(), image.height());
            println!("\nExports will use the primary template.");
            return Ok(());
        }
        Err(e) => println!("[WARN] Primary template: {e}"),
    }

    match provider.load(&fallback_data_url()).await {
        Ok(image) => {
            println!("[OK] Bundled template: {}x{}", image.width(), image.height());
            println!("\nExports will use the bundled template.");
        }
        Err(e) => {
            println!("[FAIL] Bundled template: {e}");
            println!("\nExports will render on a blank page.");
        }
    }

    Ok(())
}
