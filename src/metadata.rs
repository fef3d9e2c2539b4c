//! What the builder pipeline did to a grid. Only used to describe a maze, never to generate one.

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Culled {
    pub ratio: f32,
    pub passes: usize,
}

#[derive(PartialEq, Clone, Debug, Default)]
pub struct GridMetadata {
    generator: Option<&'static str>,
    looped: Option<usize>,
    culled: Option<Culled>,
    braided: Option<f32>,
    deleted: Option<f32>,
}

impl GridMetadata {
    pub fn new() -> GridMetadata {
        GridMetadata::default()
    }

    #[inline]
    pub fn generator(&self) -> Option<&'static str> {
        self.generator
    }

    /// Number of extra generator passes run over the carved maze.
    #[inline]
    pub fn looped(&self) -> Option<usize> {
        self.looped
    }

    #[inline]
    pub fn culled(&self) -> Option<Culled> {
        self.culled
    }

    #[inline]
    pub fn braided(&self) -> Option<f32> {
        self.braided
    }

    #[inline]
    pub fn deleted(&self) -> Option<f32> {
        self.deleted
    }

    pub(crate) fn set_generator(&mut self, name: &'static str) {
        self.generator = Some(name);
    }

    pub(crate) fn set_looped(&mut self, count: usize) {
        self.looped = Some(count);
    }

    pub(crate) fn set_culled(&mut self, ratio: f32, passes: usize) {
        self.culled = Some(Culled { ratio, passes });
    }

    pub(crate) fn set_braided(&mut self, ratio: f32) {
        self.braided = Some(ratio);
    }

    pub(crate) fn set_deleted(&mut self, ratio: f32) {
        self.deleted = Some(ratio);
    }
}
