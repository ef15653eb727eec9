use std::path::Path;

use demoreel_editor::AnalysisConfig;
use demoreel_media::{check_ffmpeg, check_ffprobe};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AnalysisConfig::from_env();

    println!(
        "demoreel-selfcheck: starting with tool_timeout={}s frame_workers={}",
        config.tool_timeout.as_secs(),
        config.frame_workers
    );

    let ffmpeg = check_ffmpeg()?;
    let ffprobe = check_ffprobe()?;
    println!("demoreel-selfcheck: ffmpeg={} ffprobe={}", ffmpeg.display(), ffprobe.display());

    ensure_tool_runs(&ffmpeg).await?;
    ensure_tool_runs(&ffprobe).await?;
    ensure_scratch_writable()?;

    println!("demoreel-selfcheck: ok");
    Ok(())
}

async fn ensure_tool_runs(tool: &Path) -> anyhow::Result<()> {
    let output = tokio::process::Command::new(tool)
        .arg("-version")
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("{} not runnable: {}", tool.display(), e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "{} -version failed: {:?}",
            tool.display(),
            output.status
        ));
    }
    Ok(())
}

fn ensure_scratch_writable() -> anyhow::Result<()> {
    let dir = tempfile::Builder::new().prefix("demoreel-selfcheck-").tempdir()?;
    std::fs::write(dir.path().join("probe"), b"ok")?;
    dir.close()?;
    Ok(())
}
