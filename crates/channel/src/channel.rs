//! Single-producer/single-consumer endpoints
//!
//! Both indices are monotonically increasing `u64` counters; ring position
//! `i` lives in slot `i % capacity`. The ring is full when
//! `write - read == capacity`, so every slot is usable.
//!
//! Each endpoint keeps its own index locally and a cached copy of the peer's,
//! refreshing the cache (an acquire load) only when it says full or empty.

use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use hermes_core::Event;

use crate::config::ChannelConfig;
use crate::error::SegmentError;
use crate::segment::Segment;

/// Poll interval while waiting for a writer to publish its segment
const OPEN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Producing end of a channel
pub struct ChannelWriter {
    segment: Segment,
    write: u64,
    cached_read: u64,
}

impl ChannelWriter {
    /// Create the named segment, or attach to an existing one
    ///
    /// The creating writer unlinks the segment when dropped.
    pub fn open(config: &ChannelConfig) -> Result<Self, SegmentError> {
        let segment = Segment::create_or_open(config)?;
        let header = segment.header();
        let write = header.write_index.load(Ordering::Acquire);
        let cached_read = header.read_index.load(Ordering::Acquire);
        Ok(Self {
            segment,
            write,
            cached_read,
        })
    }

    /// Append one event; `false` if the ring is full
    ///
    /// Never blocks and never allocates. A rejected event is not stored.
    pub fn try_write(&mut self, event: &Event) -> bool {
        let capacity = self.segment.capacity();
        if self.write - self.cached_read >= capacity {
            self.cached_read = self.segment.header().read_index.load(Ordering::Acquire);
            if self.write - self.cached_read >= capacity {
                return false;
            }
        }

        // SAFETY: the slot at `write` is outside [read, write) and the reader
        // never touches it until the release store below.
        unsafe { self.segment.slot(self.write).write(*event) };
        self.write += 1;
        self.segment
            .header()
            .write_index
            .store(self.write, Ordering::Release);
        true
    }

    /// Events written but not yet consumed
    pub fn len(&self) -> usize {
        let read = self.segment.header().read_index.load(Ordering::Acquire);
        self.write.saturating_sub(read) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() as u64 >= self.segment.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.segment.capacity() as usize
    }

    pub fn name(&self) -> &str {
        self.segment.name()
    }

    /// True if this writer created the segment and will unlink it
    pub fn is_owner(&self) -> bool {
        self.segment.is_owner()
    }
}

/// Consuming end of a channel
pub struct ChannelReader {
    segment: Segment,
    read: u64,
    cached_write: u64,
}

impl ChannelReader {
    /// Attach to a segment a writer has already published
    pub fn open(config: &ChannelConfig) -> Result<Self, SegmentError> {
        let segment = Segment::open(config)?;
        let header = segment.header();
        let read = header.read_index.load(Ordering::Acquire);
        let cached_write = header.write_index.load(Ordering::Acquire);
        Ok(Self {
            segment,
            read,
            cached_write,
        })
    }

    /// Open, polling until the writer has published the segment or
    /// `timeout` expires
    pub fn open_with_wait(config: &ChannelConfig, timeout: Duration) -> Result<Self, SegmentError> {
        let deadline = Instant::now() + timeout;
        let mut logged = false;
        loop {
            match Self::open(config) {
                Ok(reader) => return Ok(reader),
                Err(e @ (SegmentError::NotFound(_) | SegmentError::Uninitialized(_))) => {
                    if Instant::now() >= deadline {
                        return Err(e);
                    }
                    if !logged {
                        log::info!("[channel] Waiting for writer on {}", config.name);
                        logged = true;
                    }
                    thread::sleep(OPEN_POLL_INTERVAL);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Take the oldest event; `None` if the ring is empty
    pub fn try_read(&mut self) -> Option<Event> {
        if self.read == self.cached_write {
            self.cached_write = self.segment.header().write_index.load(Ordering::Acquire);
            if self.read == self.cached_write {
                return None;
            }
        }

        // SAFETY: the slot at `read` is inside [read, write) and was fully
        // written before the acquire load of the write index.
        let event = unsafe { self.segment.slot(self.read).read() };
        self.read += 1;
        self.segment
            .header()
            .read_index
            .store(self.read, Ordering::Release);
        Some(event)
    }

    /// Events waiting to be read
    pub fn len(&self) -> usize {
        let write = self.segment.header().write_index.load(Ordering::Acquire);
        write.saturating_sub(self.read) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.segment.capacity() as usize
    }

    pub fn name(&self) -> &str {
        self.segment.name()
    }
}

#[cfg(test)]
mod tests {
    use hermes_core::{Balance, Depth};
    use tempfile::TempDir;

    use super::*;

    fn config(dir: &TempDir, capacity: usize) -> ChannelConfig {
        ChannelConfig::new("unit", capacity).with_directory(dir.path())
    }

    fn depth(id: u32, last: f64) -> Event {
        Event::Depth(Depth {
            instrument_id: id,
            last,
            ..Default::default()
        })
    }

    #[test]
    fn test_fifo_within_capacity() {
        let dir = TempDir::new().unwrap();
        let mut writer = ChannelWriter::open(&config(&dir, 4)).unwrap();
        let mut reader = ChannelReader::open(&config(&dir, 4)).unwrap();

        assert!(reader.try_read().is_none());
        for i in 0..3 {
            assert!(writer.try_write(&depth(i, i as f64)));
        }
        assert_eq!(reader.len(), 3);
        for i in 0..3 {
            assert_eq!(reader.try_read(), Some(depth(i, i as f64)));
        }
        assert!(reader.try_read().is_none());
        assert!(writer.is_empty());
    }

    #[test]
    fn test_oversized_capacity_is_rejected_before_creating_file() {
        let dir = TempDir::new().unwrap();
        let huge = config(&dir, usize::MAX / 2);

        assert!(matches!(
            ChannelWriter::open(&huge),
            Err(SegmentError::CapacityTooLarge(_))
        ));
        assert!(!huge.path().exists());
    }

    #[test]
    fn test_full_ring_rejects_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let mut writer = ChannelWriter::open(&config(&dir, 2)).unwrap();
        let mut reader = ChannelReader::open(&config(&dir, 2)).unwrap();

        assert!(writer.try_write(&depth(0, 1.0)));
        assert!(writer.try_write(&depth(0, 2.0)));
        assert!(writer.is_full());
        assert!(!writer.try_write(&depth(0, 3.0)));

        assert_eq!(reader.try_read(), Some(depth(0, 1.0)));
        // One slot freed
        assert!(writer.try_write(&depth(0, 4.0)));
        assert_eq!(reader.try_read(), Some(depth(0, 2.0)));
        assert_eq!(reader.try_read(), Some(depth(0, 4.0)));
        assert_eq!(reader.try_read(), None);
    }

    #[test]
    fn test_wraps_around_many_times() {
        let dir = TempDir::new().unwrap();
        let mut writer = ChannelWriter::open(&config(&dir, 3)).unwrap();
        let mut reader = ChannelReader::open(&config(&dir, 3)).unwrap();

        for round in 0..50u32 {
            let event = Event::Balance(Balance {
                account_id: round,
                balance: f64::from(round),
                ..Default::default()
            });
            assert!(writer.try_write(&event));
            assert_eq!(reader.try_read(), Some(event));
        }
    }

    #[test]
    fn test_reader_requires_segment() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ChannelReader::open(&config(&dir, 4)),
            Err(SegmentError::NotFound(_))
        ));
    }

    #[test]
    fn test_capacity_mismatch() {
        let dir = TempDir::new().unwrap();
        let _writer = ChannelWriter::open(&config(&dir, 4)).unwrap();
        assert!(matches!(
            ChannelReader::open(&config(&dir, 8)),
            Err(SegmentError::CapacityMismatch {
                expected: 8,
                found: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_owner_unlinks_on_drop() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, 4);
        let writer = ChannelWriter::open(&cfg).unwrap();
        assert!(writer.is_owner());
        assert!(cfg.path().exists());

        let second = ChannelWriter::open(&cfg).unwrap();
        assert!(!second.is_owner());
        drop(second);
        assert!(cfg.path().exists());

        drop(writer);
        assert!(!cfg.path().exists());
    }

    #[test]
    fn test_open_with_wait_times_out() {
        let dir = TempDir::new().unwrap();
        let started = Instant::now();
        let result = ChannelReader::open_with_wait(&config(&dir, 4), Duration::from_millis(30));
        assert!(matches!(result, Err(SegmentError::NotFound(_))));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_uninitialized_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, 4);
        std::fs::write(cfg.path(), vec![0u8; 4096]).unwrap();
        assert!(matches!(
            ChannelReader::open(&cfg),
            Err(SegmentError::Uninitialized(_))
        ));
    }
}
