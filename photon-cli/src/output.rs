//! Output path checks for single-file conversion.

use std::path::Path;

use anyhow::{Context, bail};

/// What the user allowed us to do with the output path.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutputConfig {
    /// Overwrite an existing file.
    pub force: bool,
    /// Create missing parent directories.
    pub mkdir: bool,
}

impl OutputConfig {
    pub fn new(force: bool, mkdir: bool) -> Self {
        Self { force, mkdir }
    }

    /// Refuse to clobber the input or an existing file without --force.
    pub fn check_writable(&self, input: &Path, output: &Path) -> anyhow::Result<()> {
        if let (Ok(ci), Ok(co)) = (input.canonicalize(), output.canonicalize())
            && ci == co
        {
            bail!("output would overwrite input: {}", input.display());
        }

        if output.exists() && !self.force {
            bail!(
                "output already exists: {}\nUse --force to overwrite",
                output.display()
            );
        }

        Ok(())
    }

    /// Create the output's parent directory when --mkdir was given.
    ///
    /// Without it a missing directory is left for the write to report.
    pub fn prepare(&self, output: &Path) -> anyhow::Result<()> {
        if !self.mkdir {
            return Ok(());
        }
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory: {}", parent.display()))?;
        }
        Ok(())
    }
}
