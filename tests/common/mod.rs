//! Shared helpers: stand-in tool scripts and event collection

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use clipfetch::ProgressEvent;
use tokio::sync::mpsc;

/// Write an executable shell script into `dir`
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// ffmpeg stand-in that records its arguments and writes the output file
#[cfg(unix)]
pub fn ffmpeg_ok(dir: &Path) -> PathBuf {
    let log = dir.join("ffmpeg-args.txt");
    write_script(
        dir,
        "ffmpeg",
        &format!(
            "echo \"$@\" > '{}'\neval \"out=\\${{$(($# - 1))}}\"\nprintf 'clip' > \"$out\"\nexit 0\n",
            log.display()
        ),
    )
}

/// ffmpeg stand-in that rejects its input
#[cfg(unix)]
pub fn ffmpeg_invalid_input(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "ffmpeg",
        "echo \"$2: Invalid data found when processing input\" >&2\nexit 1\n",
    )
}

/// yt-dlp stand-in: names the file after the last URL segment and reports progress on both streams
#[cfg(unix)]
pub fn ytdlp_ok(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "yt-dlp",
        r#"prev=""
tmpl=""
url=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then tmpl="$arg"; fi
  prev="$arg"
  url="$arg"
done
id=$(basename "$url")
out=$(printf '%s' "$tmpl" | sed -e "s/%(title)s/$id/" -e 's/%(ext)s/mp4/')
echo "[youtube] $id: Downloading webpage"
echo "clipfetch-progress|downloading|250|1000|NA| 25.0%"
echo "clipfetch-progress|downloading|NA|NA|NA| 60.0%" >&2
echo "clipfetch-progress|downloading|100|1000|NA| 10.0%"
echo "clipfetch-progress|downloading|1000|1000|NA|100.0%"
echo "clipfetch-progress|finished|1000|1000|NA|100.0%"
printf 'video' > "$out"
echo "clipfetch-output|$out"
exit 0
"#,
    )
}

/// yt-dlp stand-in that fails like an unavailable video
#[cfg(unix)]
pub fn ytdlp_unavailable(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "yt-dlp",
        "echo 'WARNING: unable to extract uploader' >&2\necho 'ERROR: [youtube] abc: Video unavailable' >&2\nexit 1\n",
    )
}

/// File with a video extension; contents do not matter to the stand-ins
pub fn fake_video(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"not really a video").unwrap();
    path
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
