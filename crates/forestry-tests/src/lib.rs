//! Shared fixtures for the integration suites.

use forestry_core::{Forestry, MemoryStore, Result};

/// Reference list used across the suites: 30 fruits with stable uids.
pub const FRUITS: [(&str, &str); 30] = [
    ("apple[uid: 58]", "🍎"),
    ("apricot[uid: 0]", "🤷"),
    ("banana[uid: 218]", "🍌"),
    ("blueberry[uid: 0]", "🫐"),
    ("cherry[uid: 0]", "🍒"),
    ("coconut[uid: 0]", "🥥"),
    ("cranberry[uid: 0]", "🤷"),
    ("fig[uid: 68267]", "🤷"),
    ("grapefruit[uid: 0]", "🤷"),
    ("grapes[uid: 0]", "🍇"),
    ("guava[uid: 344]", "🤷"),
    ("kiwi[uid: 0]", "🥝"),
    ("kumquat[uid: 0]", "🤷"),
    ("lemon[uid: 0]", "🍋"),
    ("lime[uid: 0]", "🤷"),
    ("mango[uid: 0]", "🥭"),
    ("orange[uid: 0]", "🍊"),
    ("papaya[uid: 0]", "🤷"),
    ("passionfruit[uid: 0]", "🤷"),
    ("peach[uid: 0]", "🍑"),
    ("pear[uid: 0]", "🤷"),
    ("pineapple[uid: 12577]", "🍍"),
    ("plum[uid: 15492]", "🤷"),
    ("pomegranate[uid: 0]", "🤷"),
    ("raspberry[uid: 0]", "🤷"),
    ("strawberry[uid: 2532]", "🍓"),
    ("tangerine[uid: 11]", "🍊"),
    ("tomato[uid: 83468]", "🍅"),
    ("watermelon[uid: 0]", "🍉"),
    ("yuzu[uid: 0]", "🤷"),
];

/// Root hash of the full reference list, in any insertion order.
pub const FRUITS_ROOT: &str = "ee57de5169e7be3f32ce7a486e8816c808d7751e7df0a27ab576bf18ef1afbdd";

/// The reference list as byte pairs.
pub fn fruits() -> Vec<(Vec<u8>, Vec<u8>)> {
    FRUITS
        .iter()
        .map(|(key, value)| (key.as_bytes().to_vec(), value.as_bytes().to_vec()))
        .collect()
}

/// A trie holding the full reference list.
pub fn fruit_trie() -> Result<Forestry<MemoryStore>> {
    Forestry::from_list(fruits())
}

/// A trie holding the reference list minus one key.
pub fn fruit_trie_without(excluded: &str) -> Result<Forestry<MemoryStore>> {
    Forestry::from_list(
        fruits()
            .into_iter()
            .filter(|(key, _)| key.as_slice() != excluded.as_bytes()),
    )
}
