use crate::entities::dataset::TickDataset;

pub trait TickSource {
    fn generate(&self) -> Result<TickDataset, String>;
}
