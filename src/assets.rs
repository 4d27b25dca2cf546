//! Victory art loading.
//!
//! The art is read on its own thread so a slow disk never stalls the frame
//! loop.  The renderer only ever sees the finished result.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use log::{info, warn};

use crate::error::GameError;

/// Multi-line text art shown below the victory message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VictoryArt {
    pub lines: Vec<String>,
}

impl VictoryArt {
    pub fn from_text(text: &str) -> Self {
        VictoryArt {
            lines: text.lines().map(|l| l.trim_end().to_string()).collect(),
        }
    }

    /// Art used until (or instead of) a loaded file.
    pub fn builtin() -> Self {
        Self::from_text(BUILTIN_ART)
    }

    pub fn width(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
    }
}

const BUILTIN_ART: &str = r"    \   |   /
  -- ( ☼ ) --
    /   |   \
 ╔═══════════╗
 ║  VICTORY  ║
 ╚═══════════╝";

pub fn load_victory_art(path: &Path) -> Result<VictoryArt, GameError> {
    std::fs::read_to_string(path)
        .map(|text| VictoryArt::from_text(&text))
        .map_err(|source| GameError::Asset {
            path: path.to_path_buf(),
            source,
        })
}

/// Handle on a victory art load running in the background.
pub struct VictoryArtLoader {
    rx: Option<mpsc::Receiver<Result<VictoryArt, GameError>>>,
    art: Option<VictoryArt>,
}

impl VictoryArtLoader {
    /// Start loading `path`, or fall straight back to the built-in art when no
    /// path is given.
    pub fn spawn(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return VictoryArtLoader {
                rx: None,
                art: Some(VictoryArt::builtin()),
            };
        };

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver dropped means the game already exited.
            let _ = tx.send(load_victory_art(&path));
        });
        VictoryArtLoader {
            rx: Some(rx),
            art: None,
        }
    }

    /// The art once the load has finished, `None` while still loading.
    ///
    /// A failed load is logged and replaced by the built-in art.
    pub fn poll(&mut self) -> Option<&VictoryArt> {
        if self.art.is_none() {
            let result = match &self.rx {
                Some(rx) => match rx.try_recv() {
                    Ok(result) => Some(result),
                    Err(mpsc::TryRecvError::Empty) => None,
                    Err(mpsc::TryRecvError::Disconnected) => Some(Ok(VictoryArt::builtin())),
                },
                None => Some(Ok(VictoryArt::builtin())),
            };
            match result {
                Some(Ok(art)) => {
                    info!("victory art ready ({} lines)", art.lines.len());
                    self.art = Some(art);
                    self.rx = None;
                }
                Some(Err(e)) => {
                    warn!("{e}; using built-in victory art");
                    self.art = Some(VictoryArt::builtin());
                    self.rx = None;
                }
                None => {}
            }
        }
        self.art.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{Duration, Instant};

    fn wait_for(loader: &mut VictoryArtLoader) -> VictoryArt {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(art) = loader.poll() {
                return art.clone();
            }
            assert!(Instant::now() < deadline, "victory art never became ready");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn no_path_is_ready_immediately() {
        let mut loader = VictoryArtLoader::spawn(None);
        assert_eq!(loader.poll(), Some(&VictoryArt::builtin()));
    }

    #[test]
    fn loads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, " /\\ ").unwrap();
        writeln!(file, "/__\\").unwrap();
        let mut loader = VictoryArtLoader::spawn(Some(file.path().to_path_buf()));
        let art = wait_for(&mut loader);
        assert_eq!(art.lines, vec![" /\\".to_string(), "/__\\".to_string()]);
        assert_eq!(art.width(), 4);
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let path = PathBuf::from("/definitely/not/here/victory.txt");
        let mut loader = VictoryArtLoader::spawn(Some(path));
        assert_eq!(wait_for(&mut loader), VictoryArt::builtin());
    }

    #[test]
    fn load_error_names_the_path() {
        let err = load_victory_art(Path::new("/no/such/art.txt")).unwrap_err();
        assert!(err.to_string().contains("/no/such/art.txt"));
    }
}
