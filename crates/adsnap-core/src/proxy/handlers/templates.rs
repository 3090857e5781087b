use std::path::Path;

use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::proxy::server::AppState;

const TEMPLATE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

pub async fn handle_list_templates(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(list_templates(&state.config.templates_path()).await?))
}

/// Image file names in `dir`, sorted. A missing directory is an empty list.
pub async fn list_templates(dir: &Path) -> AppResult<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if TEMPLATE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
