use crate::error::{AppError, AppResult};
use crate::models::answer_sheet::AnswerSheet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载一份答卷
pub async fn load_answer_sheet(toml_file_path: &Path) -> AppResult<AnswerSheet> {
    let path_text = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_text, e))?;

    let mut sheet: AnswerSheet =
        toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(&path_text, e))?;

    sheet.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(sheet)
}

/// 加载文件夹中的所有答卷，按文件名排序；单个文件解析失败只记警告
pub async fn load_all_answer_sheets(folder_path: &str) -> AppResult<Vec<AnswerSheet>> {
    let folder = PathBuf::from(folder_path);

    if !folder.is_dir() {
        return Err(AppError::directory_not_found(folder_path));
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut sheets = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_answer_sheet(&path).await {
            Ok(sheet) => {
                tracing::info!("成功加载 {} 条答案", sheet.answers.len());
                sheets.push(sheet);
            }
            Err(e) => {
                tracing::warn!("加载文件失败: {}", e);
            }
        }
    }

    Ok(sheets)
}
