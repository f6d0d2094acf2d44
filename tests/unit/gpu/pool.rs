use super::*;
use crate::foundation::core::{Color, IntRect};

#[test]
fn released_storage_is_reused_and_cleared() {
    let mut pool = TexturePool::new(TexturePoolOpts::default());
    let mut s = pool.take(4, 4).unwrap();
    s.fill_rect(IntRect::from_size(4, 4), Color::rgb(1, 2, 3));
    pool.give_back(s);
    assert_eq!(pool.stats().retained, 1);

    let s = pool.take(4, 4).unwrap();
    assert_eq!(s.pixel(0, 0), Some(Color::transparent()));
    let st = pool.stats();
    assert_eq!(st.allocated, 1);
    assert_eq!(st.reused, 1);
    assert_eq!(st.retained, 0);
}

#[test]
fn bucket_limit_drops_extra_releases() {
    let mut pool = TexturePool::new(TexturePoolOpts {
        max_pool_bytes: usize::MAX,
        max_per_bucket: 1,
    });
    let a = pool.take(2, 2).unwrap();
    let b = pool.take(2, 2).unwrap();
    pool.give_back(a);
    pool.give_back(b);
    let st = pool.stats();
    assert_eq!(st.retained, 1);
    assert_eq!(st.dropped_on_release, 1);
}

#[test]
fn byte_limit_drops_large_surfaces() {
    let mut pool = TexturePool::new(TexturePoolOpts {
        max_pool_bytes: 16,
        max_per_bucket: 8,
    });
    let big = pool.take(4, 4).unwrap();
    pool.give_back(big);
    assert_eq!(pool.stats().retained, 0);
    assert_eq!(pool.stats().dropped_on_release, 1);
}
