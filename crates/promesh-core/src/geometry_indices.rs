#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexIndex(pub u32);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornerIndex(pub u32);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceIndex(pub u32);

pub const INVALID_VERTEX_INDEX: VertexIndex = VertexIndex(u32::MAX);
pub const INVALID_CORNER_INDEX: CornerIndex = CornerIndex(u32::MAX);
pub const INVALID_FACE_INDEX: FaceIndex = FaceIndex(u32::MAX);

impl From<u32> for VertexIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<VertexIndex> for u32 {
    fn from(v: VertexIndex) -> Self {
        v.0
    }
}

impl From<usize> for VertexIndex {
    fn from(v: usize) -> Self {
        Self(v as u32)
    }
}

impl From<VertexIndex> for usize {
    fn from(v: VertexIndex) -> Self {
        v.0 as usize
    }
}

impl VertexIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
