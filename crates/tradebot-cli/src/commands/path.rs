//! 설정 파일 경로 확인.

use std::io::Write;

use anyhow::Result;
use tradebot_core::ConfigSources;

/// 사용할 설정 파일과 dotenv 파일 경로를 출력합니다.
pub fn print_paths(sources: &ConfigSources, out: &mut impl Write) -> Result<()> {
    let exists = |found: bool| if found { "" } else { " (not found)" };

    writeln!(
        out,
        "config: {}{}",
        sources.config_file.display(),
        exists(sources.config_file.is_file())
    )?;

    match &sources.dotenv_file {
        Some(dotenv) => writeln!(
            out,
            "dotenv: {}{}",
            dotenv.display(),
            exists(dotenv.is_file())
        )?,
        None => writeln!(out, "dotenv: (disabled)")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yaml");
        std::fs::write(&config, "app: {}\n").unwrap();

        let sources = ConfigSources::new(&config).with_dotenv(dir.path().join(".env"));
        let mut out = Vec::new();
        print_paths(&sources, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("config: {}\n", config.display())));
        assert!(text.contains(".env (not found)"));
    }

    #[test]
    fn test_print_paths_without_dotenv() {
        let mut out = Vec::new();
        print_paths(&ConfigSources::new("missing.yaml"), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("missing.yaml (not found)"));
        assert!(text.contains("dotenv: (disabled)"));
    }
}
