#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Something drawn over or as part of the map.
pub trait Layer {
    fn id(&self) -> LayerId;

    /// Short human-readable kind, used in logs and CLI output.
    fn kind(&self) -> &'static str;
}
