//! khashmap sample program
//!
//! Fills a map with random pairs and prints a dump of it, followed by the
//! lookup of a random key. An optional JSON configuration path may be
//! given as the first argument.

// Use jemalloc as global allocator
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

use khashmap::sample::{self, SharedMap};
use khashmap::types::{DEFAULT_SAMPLE_COUNT, DEFAULT_SAMPLE_KEY_RANGE};
use khashmap::{HashMapConfig, KHashMap};
use parking_lot::Mutex;
use rand::Rng;
use std::env;
use std::process;

fn main() {
    let config = match env::args().nth(1) {
        Some(path) => match HashMapConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("failed to load configuration {}: {}", path, err);
                process::exit(1);
            }
        },
        None => HashMapConfig::default(),
    };

    let shared: SharedMap<u64> = Mutex::new(KHashMap::with_config(config));
    let mut rng = rand::thread_rng();

    {
        let mut map = shared.lock();
        if let Err(err) = map.init() {
            eprintln!("failed to allocate hash map: {}", err);
            process::exit(1);
        }

        // Fill the hash map with random values
        let filled = sample::fill_random(
            &mut map,
            &mut rng,
            DEFAULT_SAMPLE_COUNT,
            DEFAULT_SAMPLE_KEY_RANGE,
        );
        if let Err(err) = filled {
            map.destroy();
            eprintln!("failed to fill hash map: {}", err);
            process::exit(1);
        }
    }

    let key = rng.gen_range(0..DEFAULT_SAMPLE_KEY_RANGE);
    print!("{}", sample::dump_shared(&shared, key));

    shared.lock().destroy();
}
