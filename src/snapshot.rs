use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::world::World;

/// Writes a JSON fleet snapshot every `interval_ticks` steps. An interval of
/// zero disables writing.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    pub fn maybe_write(&self, world: &World, scenario_name: &str) -> Result<Option<PathBuf>> {
        if self.interval_ticks == 0 || world.tick() % self.interval_ticks != 0 {
            return Ok(None);
        }

        let dir = self.dir.join(scenario_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{:06}.json", world.tick()));
        let json = serde_json::to_string_pretty(&world.snapshot(scenario_name))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        log::debug!("snapshot written to {}", path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::CityBounds;

    #[test]
    fn writes_only_on_interval() {
        let temp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 2);
        let mut world = World::new(30.0, CityBounds::default());

        world.advance_time();
        assert!(writer.maybe_write(&world, "unit").unwrap().is_none());

        world.advance_time();
        let path = writer.maybe_write(&world, "unit").unwrap().unwrap();
        assert!(path.ends_with("unit/tick_000002.json"));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("\"sim_time_secs\": 60.0"));
    }

    #[test]
    fn zero_interval_disables_writes() {
        let temp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 0);
        let mut world = World::new(30.0, CityBounds::default());
        world.advance_time();
        assert!(writer.maybe_write(&world, "unit").unwrap().is_none());
    }
}
