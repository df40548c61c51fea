use crate::{
    options::{Plot, Style},
    render::{self, RenderOptions},
};
use anyhow::Result;
use log::info;
use perimeter::Crs;
use std::path::Path;

impl Plot {
    pub fn run(&self, source: &Path) -> Result<()> {
        let collection = crate::load_layer(source, &self.layer, self.years)?.reproject(self.crs)?;
        let options = self.style.render_options(self.crs)?;
        render::render(&collection, &options, &self.out)?;
        info!(
            "drew {} perimeters to {}",
            collection.len(),
            self.out.display()
        );
        Ok(())
    }
}

impl Style {
    /// Converts command line styling into render options for a map
    /// drawn in `crs`.
    pub fn render_options(&self, crs: Crs) -> Result<RenderOptions> {
        Ok(RenderOptions {
            color: self.color.0,
            opacity: self.opacity,
            extent: self.extent.map(|extent| extent.to_rect(crs)).transpose()?,
            width: self.width,
            height: self.height,
            title: self.title.clone(),
            axes: !self.no_axes,
        })
    }
}
