use crate::{
    options::{Sweep, SweepMode},
    progress, render,
};
use anyhow::Result;
use log::info;
use perimeter::YearPredicate;
use std::{fs, path::Path};

impl Sweep {
    /// Renders one frame per year in `from..=to`.
    ///
    /// Every frame shares one extent so the frames can be stepped
    /// through like a slider.
    pub fn run(&self, source: &Path) -> Result<()> {
        let span = YearPredicate::range(self.from, self.to)?;
        let shown = match self.mode {
            SweepMode::Equals => span,
            SweepMode::AtLeast => YearPredicate::at_least(self.from),
        };
        let collection = crate::load_layer(source, &self.layer, Some(shown))?.reproject(self.crs)?;

        let mut options = self.style.render_options(self.crs)?;
        if options.extent.is_none() {
            options.extent = Some(render::fit_extent(&collection)?);
        }

        fs::create_dir_all(&self.out_dir)?;
        #[allow(clippy::cast_sign_loss)]
        let pb = progress::bar(
            format!("Rendering {}", collection.layer()),
            (self.to - self.from + 1) as u64,
        );
        for year in self.from..=self.to {
            let predicate = match self.mode {
                SweepMode::Equals => YearPredicate::equals(year),
                SweepMode::AtLeast => YearPredicate::at_least(year),
            };
            let frame = collection.filter_by_year(predicate)?;
            options.title = self.style.title.as_ref().map(|title| format!("{title} {year}"));
            let out = self
                .out_dir
                .join(format!("{}_{year}.{}", collection.layer(), self.format));
            render::render(&frame, &options, &out)?;
            pb.inc(1);
        }
        pb.finish();

        info!(
            "wrote {} frames to {}",
            self.to - self.from + 1,
            self.out_dir.display()
        );
        Ok(())
    }
}
