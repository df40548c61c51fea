use crate::options::Extract;
use anyhow::Result;
use log::info;
use std::path::Path;

impl Extract {
    pub fn run(&self, source: &Path) -> Result<()> {
        let mut collection = crate::load_layer(source, &self.layer, self.years)?;
        if let Some(crs) = self.crs {
            collection = collection.reproject(crs)?;
        }
        perimeter::export::write_geojson(&collection, &self.out)?;
        info!(
            "wrote {} records in {} to {}",
            collection.len(),
            collection.crs(),
            self.out.display()
        );
        Ok(())
    }
}
