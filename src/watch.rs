use std::error::Error;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use notify::{EventKind, RecursiveMode, Watcher};

use crate::config::{self, Overrides};
use crate::report;

// Editors often emit several events per save.
const DEBOUNCE: Duration = Duration::from_millis(150);

/// Re-runs the extraction every time `path` changes. Blocks until the watcher
/// goes away; reload and extraction failures are logged and do not stop it.
pub fn watch_scene(path: &Path, overrides: &Overrides) -> Result<(), Box<dyn Error>> {
    let (tx, rx) = mpsc::channel::<()>();
    let mut watcher =
        notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Modify(_)
                    | EventKind::Create(_)
                    | EventKind::Remove(_)
                    | EventKind::Any => {
                        let _ = tx.send(());
                    }
                    _ => {}
                }
            }
        })?;
    watcher.watch(path, RecursiveMode::NonRecursive)?;
    log::info!("watching {} for changes", path.display());

    while rx.recv().is_ok() {
        std::thread::sleep(DEBOUNCE);
        while rx.try_recv().is_ok() {}

        let scene = match config::load(Some(path), overrides) {
            Ok(s) => s,
            Err(e) => {
                log::error!("reload of {} failed: {}", path.display(), e);
                continue;
            }
        };
        log::info!("scene changed; re-extracting");
        match report::run(&scene) {
            Ok(r) => r.log(),
            Err(e) => log::error!("extraction failed: {}", e),
        }
    }
    Ok(())
}
