//! `schedule` commands

use super::AppState;
use crate::schedule::{KeywordMatcher, ProgramEntry, ScheduleStore};
use crate::utils::AppResult;
use std::io::Write;

async fn load_store(state: &AppState) -> AppResult<ScheduleStore> {
    let url = state.config.schedule.url_for(&state.config.auth.area_id);
    let mut store = ScheduleStore::new(state.client.clone(), &url)?;
    store.ensure_fresh().await?;
    Ok(store)
}

/// Every program of today's schedule that has a performer
pub async fn list_programs(state: &AppState) -> AppResult<Vec<ProgramEntry>> {
    let store = load_store(state).await?;
    Ok(store.list_all().to_vec())
}

/// Programs matching any of `keywords`
pub async fn search_programs(state: &AppState, keywords: &[String]) -> AppResult<Vec<ProgramEntry>> {
    let matcher = KeywordMatcher::new(keywords.iter().cloned());
    if !matcher.is_enabled() {
        tracing::warn!("No keywords given, nothing to search for");
        return Ok(Vec::new());
    }

    let store = load_store(state).await?;
    let found: Vec<ProgramEntry> = store.search(&matcher).into_iter().cloned().collect();
    tracing::info!("{} programs match {:?}", found.len(), matcher.terms());
    Ok(found)
}

/// Write entries as one JSON object per line
pub fn write_json_lines<W: Write>(out: &mut W, entries: &[ProgramEntry]) -> AppResult<()> {
    for entry in entries {
        serde_json::to_writer(&mut *out, entry)?;
        writeln!(out)?;
    }
    Ok(())
}
