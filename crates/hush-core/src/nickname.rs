//! Anonymous display names.
//!
//! Names are display-only: the feed never links a name to a person, and a
//! session may draw a fresh one at any time.

use rand_core::{OsRng, RngCore};

pub const ADJECTIVES: [&str; 5] = ["Bold", "Mysterious", "Silent", "Unknown", "Ghost"];
pub const NOUNS: [&str; 5] = ["User", "Poster", "Writer", "Voice", "Mind"];

fn pick<'a>(pool: &[&'a str]) -> &'a str {
  pool[(OsRng.next_u64() % pool.len() as u64) as usize]
}

/// A `"{Adjective}_{Noun}"` name drawn from the fixed pools.
pub fn generate() -> String {
  format!("{}_{}", pick(&ADJECTIVES), pick(&NOUNS))
}

/// An `"Anon"` label with a random four-digit suffix, e.g. `Anon0427`.
pub fn numbered() -> String {
  format!("Anon{:04}", OsRng.next_u32() % 10_000)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_names_come_from_the_pools() {
    for _ in 0..50 {
      let name = generate();
      let (adj, noun) = name.split_once('_').unwrap();
      assert!(ADJECTIVES.contains(&adj), "{name}");
      assert!(NOUNS.contains(&noun), "{name}");
    }
  }

  #[test]
  fn numbered_labels_have_four_digits() {
    for _ in 0..50 {
      let label = numbered();
      let digits = label.strip_prefix("Anon").unwrap();
      assert_eq!(digits.len(), 4);
      assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }
  }
}
