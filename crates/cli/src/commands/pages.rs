use anyhow::{Context as _, Result};
use spellfix_storage::{NewPage, Storage};
use std::path::PathBuf;

pub(crate) fn run_add(
    storage: &Storage,
    source: String,
    url: String,
    title: String,
    description: String,
    content: Option<String>,
    file: Option<PathBuf>,
) -> Result<()> {
    let content = match (content, file) {
        (Some(content), _) => content,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => String::new(),
    };
    let page = NewPage::new(source, url, title).description(description).content(content);
    let id = storage.add_document(&page)?;
    let stored = storage.get_document(&page.source, &page.url)?;
    tracing::info!(id, "page added");
    println!("{}", serde_json::to_string_pretty(&stored)?);
    Ok(())
}

pub(crate) fn run_search(
    storage: &Storage,
    sources: &[String],
    query: &str,
    page: u32,
    page_size: u32,
) -> Result<()> {
    let results = storage.search(sources, query, page, page_size)?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
