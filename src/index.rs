//! Single 32-bit handle space shared by rules and their ephemeral instances.
//!
//! Rules occupy the lower half (top bit clear), instances the upper half.
//! Both mappings are pure, so a handle survives a full graph rebuild as long
//! as the backend keeps reporting the same rule id and instance UID.

/// Top bit marks an instance handle.
pub const INSTANCE_FLAG: u32 = 0x8000_0000;

const RULE_MASK: u32 = 0x7FFF_FFFF;

/// What a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Rule id (equal to its index).
    Rule(u32),
    /// Instance index; resolve through the graph.
    Instance(u32),
}

impl Handle {
    pub fn from_index(index: u32) -> Handle {
        if is_instance_index(index) {
            Handle::Instance(index)
        } else {
            Handle::Rule(index)
        }
    }
}

pub fn rule_index(record_id: u32) -> u32 {
    record_id & RULE_MASK
}

pub fn instance_index(record_id: u32, uid: &str) -> u32 {
    INSTANCE_FLAG | (record_id << 16) | hash16(uid)
}

pub fn is_instance_index(index: u32) -> bool {
    index & INSTANCE_FLAG != 0
}

/// ELF string hash folded into 16 bits.
pub fn hash16(s: &str) -> u32 {
    let mut h: u32 = 0;
    for &c in s.as_bytes() {
        h = (h << 4).wrapping_add(c as u32);
        let g = h & 0xF000_0000;
        if g != 0 {
            h ^= g >> 24;
        }
        h &= !g;
    }
    h % 0xFFFF
}
