//! Bounded memo of shaped runs.
//!
//! Entries are keyed by a 64-bit FNV-1a hash of the normalised sequence,
//! sentinels included. When the cache is full one entry, chosen uniformly
//! at random, is evicted before a new one goes in. Rendered artifacts are
//! handed back to the renderer exactly once: on eviction, on rebuild, on
//! [`ShapingCache::clear`] or on [`ShapingCache::dispose`].

use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

use anyhow::Context;

use crate::layout::PositionMap;
use crate::normalizer::NormalizedSequence;

const FNV_OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Order-sensitive hash of a codepoint sequence.
pub fn content_hash(codepoints: &[u32]) -> u64 {
    codepoints.iter().fold(FNV_OFFSET_BASIS, |h, &c| {
        (h ^ u64::from(c)).wrapping_mul(FNV_PRIME)
    })
}

/// The drawing side of shaping: turns positioned glyphs into something
/// the host can blit, and takes it back when the cache drops it.
pub trait GlyphRenderer {
    type Artifact;

    fn render(
        &mut self,
        seq: &NormalizedSequence,
        positions: &PositionMap,
    ) -> anyhow::Result<Self::Artifact>;

    /// Called once for every artifact the cache lets go of.
    fn release(&mut self, artifact: Self::Artifact);
}

#[derive(Debug)]
pub struct CacheEntry<A> {
    pub sequence: NormalizedSequence,
    pub positions: PositionMap,
    pub artifact: A,
    pub total_width: i32,
}

/// Whether the cache has served anything since it was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Fresh,
    Warm,
}

/// What a lookup found under the sequence's hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Miss,
    /// Another sequence with the same hash
    Collision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Reuse,
    Rebuild,
    Insert,
}

/// `(state, lookup) → (next state, action)`.
fn transition(state: CacheState, lookup: Lookup, first_use_rebuild: bool) -> (CacheState, Action) {
    match (state, lookup) {
        (CacheState::Fresh, Lookup::Hit) if first_use_rebuild => (CacheState::Warm, Action::Rebuild),
        (_, Lookup::Hit) => (CacheState::Warm, Action::Reuse),
        (_, Lookup::Collision) => (CacheState::Warm, Action::Rebuild),
        (_, Lookup::Miss) => (CacheState::Warm, Action::Insert),
    }
}

/// xorshift64* generator for picking eviction victims.
#[derive(Debug, Clone)]
struct VictimPicker(u64);

impl VictimPicker {
    fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| RandomState::new().build_hasher().finish());
        // zero is a fixed point of xorshift
        Self(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

pub struct ShapingCache<A> {
    entries: HashMap<u64, CacheEntry<A>>,
    /// Dense key list for O(1) random eviction
    keys: Vec<u64>,
    capacity: usize,
    state: CacheState,
    first_use_rebuild: bool,
    picker: VictimPicker,
}

impl<A> std::fmt::Debug for ShapingCache<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapingCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("state", &self.state)
            .finish()
    }
}

impl<A> ShapingCache<A> {
    /// A cache holding at most `capacity` entries (at least one).
    ///
    /// `seed` makes eviction reproducible; `first_use_rebuild` makes the
    /// first lookup after construction rebuild its entry even on a hit.
    pub fn new(capacity: usize, seed: Option<u64>, first_use_rebuild: bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            capacity,
            state: CacheState::Fresh,
            first_use_rebuild,
            picker: VictimPicker::new(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    pub fn get(&self, seq: &NormalizedSequence) -> Option<&CacheEntry<A>> {
        self.entries
            .get(&content_hash(seq.codepoints()))
            .filter(|e| &e.sequence == seq)
    }

    fn classify(&self, hash: u64, seq: &NormalizedSequence) -> Lookup {
        match self.entries.get(&hash) {
            Some(entry) if &entry.sequence == seq => Lookup::Hit,
            Some(_) => Lookup::Collision,
            None => Lookup::Miss,
        }
    }

    /// The entry for `seq`, laying it out and rendering it if needed.
    pub fn get_or_build<R, F>(
        &mut self,
        seq: NormalizedSequence,
        layout: F,
        renderer: &mut R,
    ) -> anyhow::Result<&CacheEntry<A>>
    where
        R: GlyphRenderer<Artifact = A>,
        F: FnOnce(&NormalizedSequence) -> crate::error::Result<PositionMap>,
    {
        let hash = content_hash(seq.codepoints());
        let (next, action) = transition(self.state, self.classify(hash, &seq), self.first_use_rebuild);

        if action != Action::Reuse {
            let positions = layout(&seq).context("Failed to lay out text")?;
            let artifact = renderer
                .render(&seq, &positions)
                .context("Renderer failed to build artifact")?;
            if action == Action::Rebuild {
                log::debug!("Rebuilding shaping cache entry {:016x}", hash);
            }
            self.store(hash, seq, positions, artifact, renderer);
        }
        self.state = next;

        self.entries
            .get(&hash)
            .context("Shaping cache entry vanished after insertion")
    }

    /// Put an already built entry into the cache.
    pub fn insert<R>(&mut self, seq: NormalizedSequence, positions: PositionMap, artifact: A, renderer: &mut R)
    where
        R: GlyphRenderer<Artifact = A>,
    {
        let hash = content_hash(seq.codepoints());
        self.store(hash, seq, positions, artifact, renderer);
    }

    fn store<R>(&mut self, hash: u64, sequence: NormalizedSequence, positions: PositionMap, artifact: A, renderer: &mut R)
    where
        R: GlyphRenderer<Artifact = A>,
    {
        let entry = CacheEntry {
            total_width: positions.total_width(),
            sequence,
            positions,
            artifact,
        };

        if let Some(old) = self.entries.insert(hash, entry) {
            renderer.release(old.artifact);
            return;
        }

        self.keys.push(hash);
        if self.keys.len() > self.capacity {
            // never evict the entry just stored, which sits at the end
            let victim_idx = self.picker.below(self.keys.len() - 1);
            let victim = self.keys.swap_remove(victim_idx);
            if let Some(evicted) = self.entries.remove(&victim) {
                log::debug!("Evicted shaping cache entry {:016x}", victim);
                renderer.release(evicted.artifact);
            }
        }
    }

    /// Release every artifact and empty the cache.
    pub fn clear<R>(&mut self, renderer: &mut R)
    where
        R: GlyphRenderer<Artifact = A>,
    {
        self.keys.clear();
        for (_, entry) in self.entries.drain() {
            renderer.release(entry.artifact);
        }
    }

    /// Release every artifact and drop the cache.
    pub fn dispose<R>(mut self, renderer: &mut R)
    where
        R: GlyphRenderer<Artifact = A>,
    {
        self.clear(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Hands out numbered artifacts and records releases.
    #[derive(Default)]
    struct Counting {
        next_id: u32,
        rendered: u32,
        released: Vec<u32>,
    }

    impl GlyphRenderer for Counting {
        type Artifact = u32;

        fn render(&mut self, _: &NormalizedSequence, _: &PositionMap) -> anyhow::Result<u32> {
            self.next_id += 1;
            self.rendered += 1;
            Ok(self.next_id)
        }

        fn release(&mut self, artifact: u32) {
            self.released.push(artifact);
        }
    }

    fn seq(n: u32) -> NormalizedSequence {
        NormalizedSequence::from_shaped([0x41 + n])
    }

    fn layout(seq: &NormalizedSequence) -> crate::error::Result<PositionMap> {
        let n = seq.len();
        Ok(PositionMap {
            pos_x: (0..=n as i32).collect(),
            pos_y: vec![0; n],
        })
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        assert_ne!(content_hash(&[0, 1, 2, 0]), content_hash(&[0, 2, 1, 0]));
        assert_eq!(content_hash(&[]), FNV_OFFSET_BASIS);
    }

    #[test]
    fn test_transition_table() {
        use CacheState::*;
        assert_eq!(transition(Fresh, Lookup::Hit, true), (Warm, Action::Rebuild));
        assert_eq!(transition(Fresh, Lookup::Hit, false), (Warm, Action::Reuse));
        assert_eq!(transition(Fresh, Lookup::Miss, true), (Warm, Action::Insert));
        assert_eq!(transition(Warm, Lookup::Hit, true), (Warm, Action::Reuse));
        assert_eq!(transition(Warm, Lookup::Miss, true), (Warm, Action::Insert));
        assert_eq!(transition(Warm, Lookup::Collision, false), (Warm, Action::Rebuild));
    }

    #[test]
    fn test_hit_reuses_entry() {
        let mut renderer = Counting::default();
        let mut cache = ShapingCache::new(4, Some(1), true);

        let first = cache.get_or_build(seq(0), layout, &mut renderer).unwrap().artifact;
        let again = cache.get_or_build(seq(0), layout, &mut renderer).unwrap().artifact;
        assert_eq!(first, again);
        assert_eq!(renderer.rendered, 1);
        assert_eq!(cache.state(), CacheState::Warm);
        assert_eq!(cache.get(&seq(0)).unwrap().total_width, 3);
    }

    #[test]
    fn test_first_use_rebuilds_prefilled_entry() {
        let mut renderer = Counting::default();
        let mut cache = ShapingCache::new(4, Some(1), true);
        cache.insert(seq(0), PositionMap::default(), 100, &mut renderer);

        let artifact = cache.get_or_build(seq(0), layout, &mut renderer).unwrap().artifact;
        assert_eq!(artifact, 1);
        assert_eq!(renderer.released, vec![100]);

        // only the first use rebuilds
        cache.get_or_build(seq(0), layout, &mut renderer).unwrap();
        assert_eq!(renderer.rendered, 1);
    }

    #[test]
    fn test_first_use_rebuild_can_be_disabled() {
        let mut renderer = Counting::default();
        let mut cache = ShapingCache::new(4, Some(1), false);
        cache.insert(seq(0), PositionMap::default(), 100, &mut renderer);

        let artifact = cache.get_or_build(seq(0), layout, &mut renderer).unwrap().artifact;
        assert_eq!(artifact, 100);
        assert!(renderer.released.is_empty());
    }

    #[test]
    fn test_capacity_bound_and_single_release() {
        for seed in [1, 7, 42, 0xDEAD_BEEF] {
            let capacity = 8;
            let mut renderer = Counting::default();
            let mut cache = ShapingCache::new(capacity, Some(seed), true);

            for n in 0..=capacity as u32 {
                cache.get_or_build(seq(n), layout, &mut renderer).unwrap();
            }

            assert_eq!(cache.len(), capacity);
            assert_eq!(renderer.released.len(), 1);
            let evicted = renderer.released[0];
            // artifact ids are 1-based in insertion order
            assert!(cache.get(&seq(evicted - 1)).is_none());
            // the newest entry is never the victim
            assert!(cache.get(&seq(capacity as u32)).is_some());
        }
    }

    #[test]
    fn test_eviction_is_spread_out() {
        let mut renderer = Counting::default();
        let mut cache = ShapingCache::new(4, Some(99), true);
        for n in 0..200 {
            cache.get_or_build(seq(n), layout, &mut renderer).unwrap();
        }
        let released: HashSet<u32> = renderer.released.iter().copied().collect();
        assert_eq!(released.len(), renderer.released.len());
        assert_eq!(released.len(), 196);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_dispose_releases_everything_once() {
        let mut renderer = Counting::default();
        let mut cache = ShapingCache::new(16, None, true);
        for n in 0..5 {
            cache.get_or_build(seq(n), layout, &mut renderer).unwrap();
        }
        cache.dispose(&mut renderer);

        let mut released = renderer.released.clone();
        released.sort_unstable();
        assert_eq!(released, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_failed_render_leaves_cache_untouched() {
        struct Failing;
        impl GlyphRenderer for Failing {
            type Artifact = ();
            fn render(&mut self, _: &NormalizedSequence, _: &PositionMap) -> anyhow::Result<()> {
                anyhow::bail!("no surface")
            }
            fn release(&mut self, _: ()) {}
        }

        let mut cache = ShapingCache::new(2, Some(3), true);
        assert!(cache.get_or_build(seq(0), layout, &mut Failing).is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.state(), CacheState::Fresh);
    }
}
