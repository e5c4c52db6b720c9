use isomesh_volume::Dims;

use crate::constants::UNASSIGNED;
use crate::edge::Axis;

/// Which of the two rolling layers an edge slot lives in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Layer {
    /// z-min face of the active slice, plus every Z edge of the slice.
    Current,
    /// z-max face of the active slice; becomes `Current` on [`EdgeCache::advance`].
    Next,
}

impl Layer {
    #[inline]
    pub fn from_dz(dz: i32) -> Layer {
        if dz == 0 { Layer::Current } else { Layer::Next }
    }
}

/// One column's vertex indices, indexed by [`Axis::index`].
pub type Slot = [u32; 3];

const EMPTY_SLOT: Slot = [UNASSIGNED; 3];

/// Two rolling planes of per-edge vertex indices.
///
/// Each plane has one slot per cell column, `(w + 1) * (h + 1)` in total, so
/// memory stays proportional to a single z-slice however deep the volume is.
#[derive(Clone, Debug)]
pub struct EdgeCache {
    cols: usize,
    rows: usize,
    current: Vec<Slot>,
    next: Vec<Slot>,
}

impl EdgeCache {
    pub fn new(dims: Dims) -> Self {
        let cols = dims.w + 1;
        let rows = dims.h + 1;
        Self {
            cols,
            rows,
            current: vec![EMPTY_SLOT; cols * rows],
            next: vec![EMPTY_SLOT; cols * rows],
        }
    }

    #[inline]
    pub fn columns(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    #[inline]
    fn col(&self, cx: usize, cy: usize) -> usize {
        debug_assert!(cx < self.cols && cy < self.rows);
        cx + cy * self.cols
    }

    /// Moves to the next z-slice: the old `Next` plane becomes `Current` and
    /// the new `Next` plane starts out empty.
    pub fn advance(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.fill(EMPTY_SLOT);
    }

    #[inline]
    pub fn plane(&self, layer: Layer) -> &[Slot] {
        match layer {
            Layer::Current => &self.current,
            Layer::Next => &self.next,
        }
    }

    #[inline]
    fn plane_mut(&mut self, layer: Layer) -> &mut [Slot] {
        match layer {
            Layer::Current => &mut self.current,
            Layer::Next => &mut self.next,
        }
    }

    #[inline]
    pub fn get(&self, layer: Layer, cx: usize, cy: usize, axis: Axis) -> Option<u32> {
        let v = self.plane(layer)[self.col(cx, cy)][axis.index()];
        (v != UNASSIGNED).then_some(v)
    }

    /// Returns the vertex already stored for this edge, or stores and returns
    /// the one produced by `make`. `make` runs at most once per edge per plane.
    #[inline]
    pub fn resolve<E>(
        &mut self,
        layer: Layer,
        cx: usize,
        cy: usize,
        axis: Axis,
        make: impl FnOnce() -> Result<u32, E>,
    ) -> Result<u32, E> {
        let col = self.col(cx, cy);
        let slot = &mut self.plane_mut(layer)[col][axis.index()];
        if *slot == UNASSIGNED {
            *slot = make()?;
        }
        Ok(*slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(v: u32) -> impl FnOnce() -> Result<u32, ()> {
        move || Ok(v)
    }

    #[test]
    fn resolve_materializes_once() {
        let mut cache = EdgeCache::new(Dims::new(3, 2, 9));
        assert_eq!(cache.columns(), (4, 3));
        assert_eq!(cache.resolve(Layer::Current, 1, 2, Axis::X, ok(7)), Ok(7));
        let mut called = false;
        let again = cache.resolve(Layer::Current, 1, 2, Axis::X, || {
            called = true;
            Ok::<u32, ()>(99)
        });
        assert_eq!(again, Ok(7));
        assert!(!called);
        // other axes and layers are independent slots
        assert_eq!(cache.get(Layer::Current, 1, 2, Axis::Y), None);
        assert_eq!(cache.get(Layer::Next, 1, 2, Axis::X), None);
    }

    #[test]
    fn advance_rolls_next_into_current() {
        let mut cache = EdgeCache::new(Dims::cube(2));
        cache.resolve(Layer::Current, 0, 0, Axis::Z, ok(1)).unwrap();
        cache.resolve(Layer::Next, 2, 2, Axis::Y, ok(2)).unwrap();
        cache.advance();
        assert_eq!(cache.get(Layer::Current, 2, 2, Axis::Y), Some(2));
        assert_eq!(cache.get(Layer::Current, 0, 0, Axis::Z), None);
        assert!(cache.plane(Layer::Next).iter().all(|s| *s == EMPTY_SLOT));
    }

    #[test]
    fn failed_make_leaves_slot_empty() {
        let mut cache = EdgeCache::new(Dims::cube(1));
        let r: Result<u32, &str> = cache.resolve(Layer::Next, 0, 1, Axis::X, || Err("full"));
        assert_eq!(r, Err("full"));
        assert_eq!(cache.get(Layer::Next, 0, 1, Axis::X), None);
    }

    #[test]
    fn layer_follows_dz() {
        assert_eq!(Layer::from_dz(0), Layer::Current);
        assert_eq!(Layer::from_dz(1), Layer::Next);
    }
}
