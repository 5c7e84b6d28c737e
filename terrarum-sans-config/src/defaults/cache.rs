//! Default values for the shaping cache.

pub fn cache_capacity() -> usize {
    256
}

pub fn first_use_rebuild() -> bool {
    true
}
