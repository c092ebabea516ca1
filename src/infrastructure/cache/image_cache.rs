use crate::domain::entities::LoadedImage;
use crate::shared::config::ImageCacheConfig;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

struct ImageCacheState {
    entries: LruCache<String, Arc<LoadedImage>>,
    total_bytes: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageCacheStats {
    pub entries: usize,
    pub bytes: usize,
}

/// URL をキーにした画像キャッシュ。件数とバイト数の両方で上限を持つ LRU
///
/// ヒット時は非同期の待ちを挟まずに返せるよう、同期ロックで保護している
pub struct ImageCache {
    state: Mutex<ImageCacheState>,
    max_bytes: usize,
}

impl ImageCache {
    pub fn new(max_entries: NonZeroUsize, max_bytes: usize) -> Self {
        Self {
            state: Mutex::new(ImageCacheState {
                entries: LruCache::new(max_entries),
                total_bytes: 0,
            }),
            max_bytes,
        }
    }

    pub fn from_config(config: &ImageCacheConfig) -> Self {
        let max_entries = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self::new(max_entries, config.max_bytes)
    }

    fn lock(&self) -> MutexGuard<'_, ImageCacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// キャッシュを参照し、ヒットした場合は最近使用した扱いにする
    pub fn get(&self, key: &str) -> Option<Arc<LoadedImage>> {
        let mut state = self.lock();
        state.entries.get(key).cloned()
    }

    /// 画像を登録する。単体で上限を超える画像はキャッシュしない
    pub fn insert(&self, key: String, image: Arc<LoadedImage>) -> bool {
        let size = image.byte_len();
        if size > self.max_bytes {
            debug!("Skipping cache for {key}: {size} bytes exceeds limit");
            return false;
        }

        let mut state = self.lock();
        if let Some((evicted_key, evicted)) = state.entries.push(key, image) {
            state.total_bytes -= evicted.byte_len();
            debug!("Evicted image {evicted_key} from cache");
        }
        state.total_bytes += size;

        while state.total_bytes > self.max_bytes {
            match state.entries.pop_lru() {
                Some((evicted_key, evicted)) => {
                    state.total_bytes -= evicted.byte_len();
                    debug!("Evicted image {evicted_key} from cache (byte limit)");
                }
                None => break,
            }
        }
        true
    }

    pub fn stats(&self) -> ImageCacheStats {
        let state = self.lock();
        ImageCacheStats {
            entries: state.entries.len(),
            bytes: state.total_bytes,
        }
    }
}
