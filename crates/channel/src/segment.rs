//! Named shared-memory segment holding one event ring
//!
//! Layout:
//!
//! ```text
//! +--------------------------------------------------+
//! | Header: magic, schema, slot size/align, capacity  |
//! |         write index  (own cache line)             |
//! |         read index   (own cache line)             |
//! +--------------------------------------------------+
//! | slot 0 | slot 1 | ...            | slot cap-1     |
//! +--------------------------------------------------+
//! ```
//!
//! The creator fills the header and publishes `magic` last with release
//! ordering; openers acquire `magic` before trusting any other field.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::mem::{align_of, size_of};
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::utils::CachePadded;
use hermes_core::{EVENT_SCHEMA_VERSION, Event};
use memmap2::MmapMut;

use crate::config::ChannelConfig;
use crate::error::SegmentError;

/// "HERMESQ\x01"
const MAGIC: u64 = 0x4845_524D_4553_5101;

#[repr(C)]
pub(crate) struct Header {
    magic: AtomicU64,
    schema_version: u32,
    slot_size: u32,
    slot_align: u32,
    _reserved: u32,
    capacity: u64,
    pub(crate) write_index: CachePadded<AtomicU64>,
    pub(crate) read_index: CachePadded<AtomicU64>,
}

const HEADER_SIZE: usize = size_of::<Header>();
const SLOT_SIZE: usize = size_of::<Event>();

const _: () = assert!(HEADER_SIZE % align_of::<Event>() == 0);

/// Backing file length for `capacity` slots, `None` when it cannot be mapped
pub(crate) fn segment_len(capacity: usize) -> Option<u64> {
    let len = capacity.checked_mul(SLOT_SIZE)?.checked_add(HEADER_SIZE)?;
    // Slot offsets must stay within `isize` for pointer arithmetic
    isize::try_from(len).ok()?;
    u64::try_from(len).ok()
}

fn io_error(path: &Path, source: std::io::Error) -> SegmentError {
    SegmentError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A mapped segment; unlinks the backing file on drop when it created it
pub(crate) struct Segment {
    name: String,
    path: PathBuf,
    capacity: u64,
    owner: bool,
    base: NonNull<u8>,
    // Keeps the mapping alive; `base` points into it
    _mmap: MmapMut,
}

// The mapping is owned by this value and only reached through `&self`/`&mut
// self` methods of a single endpoint.
unsafe impl Send for Segment {}

impl Segment {
    /// Create the segment, or open it if it already exists
    pub(crate) fn create_or_open(config: &ChannelConfig) -> Result<Self, SegmentError> {
        config.validate()?;
        let path = config.path();

        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::debug!("[channel] Segment {} exists, attaching", config.name);
                return Self::open(config);
            }
            Err(e) => return Err(io_error(&path, e)),
        };

        let created = Self::initialize(&file, config, &path);
        if created.is_err() {
            let _ = fs::remove_file(&path);
        } else {
            log::info!(
                "[channel] Created segment {} ({} slots of {} bytes)",
                path.display(),
                config.capacity,
                SLOT_SIZE
            );
        }
        created
    }

    fn initialize(
        file: &File,
        config: &ChannelConfig,
        path: &Path,
    ) -> Result<Self, SegmentError> {
        let len = segment_len(config.capacity)
            .ok_or(SegmentError::CapacityTooLarge(config.capacity))?;
        file.set_len(len).map_err(|e| io_error(path, e))?;
        // SAFETY: the file was just created by us with the final length.
        let mut mmap = unsafe { MmapMut::map_mut(file) }.map_err(|e| io_error(path, e))?;
        let base = NonNull::new(mmap.as_mut_ptr())
            .ok_or_else(|| SegmentError::Uninitialized(config.name.clone()))?;

        let header = base.as_ptr().cast::<Header>();
        // SAFETY: the mapping is page aligned and at least HEADER_SIZE long;
        // nobody else trusts the header until `magic` is published.
        unsafe {
            ptr::addr_of_mut!((*header).schema_version).write(EVENT_SCHEMA_VERSION);
            ptr::addr_of_mut!((*header).slot_size).write(SLOT_SIZE as u32);
            ptr::addr_of_mut!((*header).slot_align).write(align_of::<Event>() as u32);
            ptr::addr_of_mut!((*header).capacity).write(config.capacity as u64);
            (*header).write_index.store(0, Ordering::Relaxed);
            (*header).read_index.store(0, Ordering::Relaxed);
            (*header).magic.store(MAGIC, Ordering::Release);
        }

        Ok(Self {
            name: config.name.clone(),
            path: path.to_path_buf(),
            capacity: config.capacity as u64,
            owner: true,
            base,
            _mmap: mmap,
        })
    }

    /// Open an existing, initialized segment
    pub(crate) fn open(config: &ChannelConfig) -> Result<Self, SegmentError> {
        config.validate()?;
        let path = config.path();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SegmentError::NotFound(path.clone()),
                _ => io_error(&path, e),
            })?;
        let len = file.metadata().map_err(|e| io_error(&path, e))?.len();
        if len < HEADER_SIZE as u64 {
            // Creator has not sized the file yet
            return Err(SegmentError::Uninitialized(config.name.clone()));
        }

        // SAFETY: the file is at least HEADER_SIZE long; the creator never
        // shrinks it.
        let mut mmap = unsafe { MmapMut::map_mut(&file) }.map_err(|e| io_error(&path, e))?;
        let base = NonNull::new(mmap.as_mut_ptr())
            .ok_or_else(|| SegmentError::Uninitialized(config.name.clone()))?;

        let segment = Self {
            name: config.name.clone(),
            path,
            capacity: config.capacity as u64,
            owner: false,
            base,
            _mmap: mmap,
        };
        segment.validate(len)?;
        Ok(segment)
    }

    fn validate(&self, file_len: u64) -> Result<(), SegmentError> {
        let header = self.header();
        if header.magic.load(Ordering::Acquire) != MAGIC {
            return Err(SegmentError::Uninitialized(self.name.clone()));
        }

        let checks = [
            (
                "schema_version",
                u64::from(EVENT_SCHEMA_VERSION),
                u64::from(header.schema_version),
            ),
            ("slot_size", SLOT_SIZE as u64, u64::from(header.slot_size)),
            (
                "slot_align",
                align_of::<Event>() as u64,
                u64::from(header.slot_align),
            ),
        ];
        for (field, expected, found) in checks {
            if expected != found {
                return Err(SegmentError::LayoutMismatch {
                    name: self.name.clone(),
                    field,
                    expected,
                    found,
                });
            }
        }

        if header.capacity != self.capacity {
            return Err(SegmentError::CapacityMismatch {
                name: self.name.clone(),
                expected: self.capacity as usize,
                found: header.capacity as usize,
            });
        }
        let expected_len = segment_len(self.capacity as usize)
            .ok_or(SegmentError::CapacityTooLarge(self.capacity as usize))?;
        if file_len < expected_len {
            return Err(SegmentError::LayoutMismatch {
                name: self.name.clone(),
                field: "length",
                expected: expected_len,
                found: file_len,
            });
        }
        Ok(())
    }

    pub(crate) fn header(&self) -> &Header {
        // SAFETY: `base` is the page-aligned start of a live mapping of at
        // least HEADER_SIZE bytes; all shared-mutable fields are atomics.
        unsafe { &*self.base.as_ptr().cast::<Header>() }
    }

    /// Pointer to the slot that holds ring position `index`
    pub(crate) fn slot(&self, index: u64) -> *mut Event {
        let offset = HEADER_SIZE + (index % self.capacity) as usize * SLOT_SIZE;
        // SAFETY: offset < segment_len(capacity), validated on open.
        unsafe { self.base.as_ptr().add(offset).cast::<Event>() }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn capacity(&self) -> u64 {
        self.capacity
    }

    pub(crate) fn is_owner(&self) -> bool {
        self.owner
    }
}

impl Drop for Segment {
    fn drop(&mut self) {
        if self.owner {
            match fs::remove_file(&self.path) {
                Ok(()) => log::debug!("[channel] Unlinked segment {}", self.path.display()),
                Err(e) => log::warn!(
                    "[channel] Failed to unlink segment {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }
    }
}
