use anyhow::Result;
use spellfix_storage::Storage;

pub(crate) fn run_index(storage: &Storage) -> Result<()> {
    let stats = storage.create_spellfix_index()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub(crate) fn run_drop_index(storage: &Storage) -> Result<()> {
    storage.drop_spellfix_index()?;
    println!("Spelling index removed");
    Ok(())
}

pub(crate) fn run_fix(storage: &Storage, query: &str) -> Result<()> {
    if !storage.has_spellfix_index()? {
        eprintln!("Warning: no spelling index, run `spellfix index` first");
    }
    println!("{}", storage.spellfix(query)?);
    Ok(())
}

pub(crate) fn run_suggest(storage: &Storage, word: &str, limit: usize) -> Result<()> {
    let suggestions = storage.suggest(word, limit)?;
    println!("{}", serde_json::to_string_pretty(&suggestions)?);
    Ok(())
}
