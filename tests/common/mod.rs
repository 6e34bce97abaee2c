use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Creates the firmware image in the output directory the tool was given.
pub const PRODUCE_IMAGE: &str =
    "mkdir -p \"$OUT/zephyr\" && printf 'uf2-image' > \"$OUT/zephyr/zmk.uf2\"";

/// Writes a stand-in build tool into `dir` and returns its path.
///
/// The script records its arguments in `invocation.txt` in its working
/// directory, then runs `body` with `$OUT` bound to the output directory.
pub fn fake_tool(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-west");
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" >> invocation.txt\nOUT=\"$4\"\n{}\n",
        body
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
