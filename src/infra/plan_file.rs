use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description};

use crate::planners::strips::Plan;

/// Human-readable plan written next to the engine's saves.
pub struct PlanFile {
    path: PathBuf,
}

impl PlanFile {
    /// Writes `plan` to `<folder>/plan-<yyyymmdd-hhmmss>.txt`, creating the
    /// folder when missing.
    pub fn write(folder: impl AsRef<Path>, plan: &Plan) -> io::Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let format = format_description::parse("[year][month][day]-[hour][minute][second]")
            .map_err(io::Error::other)?;
        let date_time_str = now.format(&format).map_err(io::Error::other)?;

        let path = folder.as_ref().join(format!("plan-{}.txt", date_time_str));
        Self::write_to(path, plan)
    }

    pub fn write_to(path: impl Into<PathBuf>, plan: &Plan) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&path)?;
        write!(file, "{}", plan)?;
        file.flush()?;

        tracing::info!(path = %path.display(), actions = plan.actions.len(), "Plan written");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{Direction, Position, ResourceKind};
    use crate::planners::strips::{DepositAction, MoveAction, StripsAction};

    #[test]
    fn test_plan_file_contents() {
        let plan = Plan {
            actions: vec![
                StripsAction::Move(MoveAction::new(1, Position::new(4, 6))),
                StripsAction::Deposit(DepositAction::new(1, Direction::North, ResourceKind::Gold)),
            ],
            cost: 4.0,
            expanded: 2,
        };
        let folder = std::env::temp_dir().join(format!("harvest-planner-test-{}", std::process::id()));

        let file = PlanFile::write(&folder, &plan).unwrap();
        let contents = std::fs::read_to_string(file.path()).unwrap();
        let name = file.path().file_name().unwrap().to_string_lossy().into_owned();

        assert!(name.starts_with("plan-") && name.ends_with(".txt"), "unexpected name {}", name);
        assert_eq!(
            contents,
            "ACTION: MOVE( 1, 4, 6 )\nACTION: DEPOSIT( 1, NORTH, GOLD )\n"
        );

        std::fs::remove_dir_all(&folder).unwrap();
    }
}
