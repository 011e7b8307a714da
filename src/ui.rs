// UI layer: provides a simple interactive menu using `dialoguer`.
// Each entry maps to one API call; results are printed and the menu is
// shown again, so a failed call never ends the session.

use crate::api::ApiClient;
use crate::config::{self, ClientConfig};
use crate::models::{AccessPolicy, ContentType, ListOptions, UploadOptions};
use anyhow::Result;
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Resolve the client config, asking for a token (and saving it) when
/// neither the environment nor the token file provides one.
pub fn resolve_config() -> Result<ClientConfig> {
    if let Ok(config) = ClientConfig::from_env() {
        return Ok(config);
    }
    println!("No access token found. Create one at https://gyazo.com/oauth/applications");
    let token = prompt_token()?;
    config::persist_token(&token)?;
    ClientConfig::from_env()
}

/// Main interactive menu. Runs a select loop until the user chooses "Exit".
pub async fn main_menu(mut api: ApiClient) -> Result<()> {
    loop {
        let items = vec![
            "Upload image",
            "List images",
            "Show image",
            "Delete image",
            "Set access token",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_upload(&api).await?,
            1 => handle_list(&api).await?,
            2 => handle_get(&api).await?,
            3 => handle_delete(&api).await?,
            4 => {
                // Keep the configured endpoints, swap only the credential.
                let token = prompt_token()?;
                let updated = api.config().clone().with_access_token(token.clone());
                api = ApiClient::new(updated)?;
                config::persist_token(&token)?;
                println!("Access token saved.");
            }
            5 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Collect a file path and optional metadata, then upload.
async fn handle_upload(api: &ApiClient) -> Result<()> {
    let path: String = Input::new().with_prompt("Image file path").interact_text()?;
    let path = PathBuf::from(path.trim());
    let Some(content_type) = ContentType::from_path(&path) else {
        println!("Unsupported file type; use png, jpeg, gif, bmp, webp, tiff or avif.");
        return Ok(());
    };
    let image = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            println!("Could not read {}: {}", path.display(), e);
            return Ok(());
        }
    };
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string();

    let mut options = UploadOptions::new(filename, content_type);
    options.title = optional_text("Title (blank to skip)")?;
    options.desc = optional_text("Description (blank to skip)")?;
    let policies = vec!["Service default", "Anyone", "Only me"];
    options.access_policy = match Select::new()
        .with_prompt("Who can see it?")
        .items(&policies)
        .default(0)
        .interact()?
    {
        1 => Some(AccessPolicy::Anyone),
        2 => Some(AccessPolicy::OnlyMe),
        _ => None,
    };
    options.app = Some(env!("CARGO_PKG_NAME").to_string());

    let spinner = spinner("Uploading...")?;
    let result = api.upload(image, &options).await;
    spinner.finish_and_clear();
    match result {
        Ok(uploaded) => {
            println!("Uploaded {}", uploaded.image_id);
            println!("  permalink: {}", uploaded.permalink_url.as_deref().unwrap_or("-"));
            println!("  url:       {}", uploaded.url.as_deref().unwrap_or("-"));
        }
        Err(e) => println!("Upload failed: {}", e),
    }
    Ok(())
}

/// Ask for optional pagination and list images.
async fn handle_list(api: &ApiClient) -> Result<()> {
    let page = optional_number("Page (blank for first)")?;
    let per_page = optional_number("Per page (blank for default)")?;
    let options = ListOptions { page, per_page };
    let options = (page.is_some() || per_page.is_some()).then_some(options);

    let spinner = spinner("Fetching images...")?;
    let result = api.list_images(options.as_ref()).await;
    spinner.finish_and_clear();
    match result {
        Ok(images) if images.is_empty() => println!("No images."),
        Ok(images) => {
            for image in images {
                let title = image.metadata.title.as_deref().unwrap_or("-");
                println!("{}  {}  {}", image.image_id, image.created_at.as_deref().unwrap_or(""), title);
            }
        }
        Err(e) => println!("List failed: {}", e),
    }
    Ok(())
}

async fn handle_get(api: &ApiClient) -> Result<()> {
    let image_id: String = Input::new().with_prompt("Image id").interact_text()?;
    let spinner = spinner("Fetching image...")?;
    let result = api.get_image(image_id.trim()).await;
    spinner.finish_and_clear();
    match result {
        Ok(image) => print_json(&image)?,
        Err(e) => println!("Lookup failed: {}", e),
    }
    Ok(())
}

async fn handle_delete(api: &ApiClient) -> Result<()> {
    let image_id: String = Input::new().with_prompt("Image id").interact_text()?;
    let spinner = spinner("Deleting...")?;
    let result = api.delete(image_id.trim()).await;
    spinner.finish_and_clear();
    match result {
        Ok(deleted) => println!("Deleted {}", deleted.image_id),
        Err(e) => println!("Delete failed: {}", e),
    }
    Ok(())
}

fn prompt_token() -> Result<String> {
    let token: String = Password::new().with_prompt("Access token").interact()?;
    Ok(token.trim().to_string())
}

fn optional_text(prompt: &str) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn optional_number(prompt: &str) -> Result<Option<u32>> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &'static str> {
            let input = input.trim();
            if input.is_empty() || input.parse::<u32>().map_or(false, |n| n > 0) {
                Ok(())
            } else {
                Err("Enter a positive number or leave blank")
            }
        })
        .interact_text()?;
    let value = value.trim();
    Ok(value.parse().ok())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
