use std::{
    path::{Path, PathBuf},
    sync::{
        Barrier, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use readbench_common::error::ErrorKind;

use crate::{
    chunked_read::{ChunkSource, ChunkedReader, ReadMode, ReadOutcome},
    fs::{DirectIoOpener, IoMode},
};

/// In-memory file that records every read issued against it.
struct MemSource {
    path: PathBuf,
    data: Vec<u8>,
    cursor: Mutex<usize>,
    cursor_reads: AtomicU64,
    offsets: Mutex<Vec<u64>>,
    short_at: Option<u64>,
    fail_cursor_reads: bool,
    interrupt_once: AtomicBool,
}

impl MemSource {
    fn new(len: usize) -> MemSource {
        MemSource {
            path: PathBuf::from("/mem/f1"),
            data: (0..len).map(|i| (i % 251) as u8).collect(),
            cursor: Mutex::new(0),
            cursor_reads: AtomicU64::new(0),
            offsets: Mutex::new(Vec::new()),
            short_at: None,
            fail_cursor_reads: false,
            interrupt_once: AtomicBool::new(false),
        }
    }

    fn sorted_offsets(&self) -> Vec<u64> {
        let mut offsets = self.offsets.lock().unwrap().clone();
        offsets.sort_unstable();
        offsets
    }
}

impl ChunkSource for MemSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_next(&self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.interrupt_once.swap(false, Ordering::SeqCst) {
            return Err(std::io::ErrorKind::Interrupted.into());
        }
        self.cursor_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_cursor_reads {
            return Err(std::io::Error::from_raw_os_error(libc::EIO));
        }
        let mut cursor = self.cursor.lock().unwrap();
        let n = buf.len().min(self.data.len() - *cursor);
        buf[..n].copy_from_slice(&self.data[*cursor..*cursor + n]);
        *cursor += n;
        Ok(n)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        self.offsets.lock().unwrap().push(offset);
        let start = (offset as usize).min(self.data.len());
        let mut n = buf.len().min(self.data.len() - start);
        if self.short_at == Some(offset) {
            n /= 2;
        }
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }
}

#[test]
fn test_sequential_reads_whole_file() {
    let source = MemSource::new(16384);
    let mut reader = ChunkedReader::new(ReadMode::Sequential, 4096, 4096, 16384).unwrap();
    let outcome = reader.read_all(&source, 16384).unwrap();
    assert_eq!(
        outcome,
        ReadOutcome {
            bytes: 16384,
            chunk_reads: 4
        }
    );
    assert_eq!(source.cursor_reads.load(Ordering::SeqCst), 4);
    assert!(source.offsets.lock().unwrap().is_empty());
}

#[test]
fn test_sequential_read_count_is_ceil() {
    // 4096 / 1536 -> 3 reads, the last one for the 1024 byte remainder.
    let source = MemSource::new(4096);
    let mut reader = ChunkedReader::new(ReadMode::Sequential, 1536, 512, 4096).unwrap();
    let outcome = reader.read_all(&source, 4096).unwrap();
    assert_eq!(outcome.bytes, 4096);
    assert_eq!(outcome.chunk_reads, 3);
}

#[test]
fn test_sequential_early_eof() {
    let source = MemSource::new(4096);
    let mut reader = ChunkedReader::new(ReadMode::Sequential, 4096, 4096, 8192).unwrap();
    let outcome = reader.read_all(&source, 8192).unwrap();
    assert_eq!(outcome.bytes, 4096);
    // One full read followed by the zero-byte end-of-file read.
    assert_eq!(outcome.chunk_reads, 2);
}

#[test]
fn test_sequential_reuses_reader_across_files() {
    let mut reader = ChunkedReader::new(ReadMode::Sequential, 4096, 4096, 8192).unwrap();
    for _ in 0..3 {
        let source = MemSource::new(8192);
        assert_eq!(reader.read_all(&source, 8192).unwrap().bytes, 8192);
    }
}

#[test]
fn test_sequential_read_error() {
    let mut source = MemSource::new(4096);
    source.fail_cursor_reads = true;
    let mut reader = ChunkedReader::new(ReadMode::Sequential, 4096, 4096, 4096).unwrap();
    let err = reader.read_all(&source, 4096).unwrap_err();
    match err.kind() {
        ErrorKind::Read { path, offset, .. } => {
            assert_eq!(path, Path::new("/mem/f1"));
            assert_eq!(*offset, 0);
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn test_sequential_retries_interrupted() {
    let source = MemSource::new(4096);
    source.interrupt_once.store(true, Ordering::SeqCst);
    let mut reader = ChunkedReader::new(ReadMode::Sequential, 4096, 4096, 4096).unwrap();
    let outcome = reader.read_all(&source, 4096).unwrap();
    assert_eq!(outcome.bytes, 4096);
    assert_eq!(outcome.chunk_reads, 1);
}

#[test]
fn test_parallel_reads_every_offset_once() {
    let chunk = 4096usize;
    let total = 8 * chunk as u64;
    let source = MemSource::new(total as usize);
    let mut reader = ChunkedReader::new(ReadMode::Parallel, chunk, 4096, total).unwrap();
    let outcome = reader.read_all(&source, total).unwrap();
    assert_eq!(outcome.bytes, total);
    assert_eq!(outcome.chunk_reads, 8);

    let expected: Vec<u64> = (0..8).map(|i| i * chunk as u64).collect();
    assert_eq!(source.sorted_offsets(), expected);
    assert_eq!(source.cursor_reads.load(Ordering::SeqCst), 0);
}

/// Source whose positioned reads only complete once `chunks` of them are
/// in flight at the same time.
struct RendezvousSource {
    path: PathBuf,
    barrier: Barrier,
    buffers: Mutex<Vec<usize>>,
}

impl ChunkSource for RendezvousSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_next(&self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::Unsupported.into())
    }

    fn read_at(&self, buf: &mut [u8], _offset: u64) -> std::io::Result<usize> {
        self.buffers.lock().unwrap().push(buf.as_ptr() as usize);
        self.barrier.wait();
        buf.fill(0xab);
        Ok(buf.len())
    }
}

#[test]
fn test_parallel_chunks_are_in_flight_together() {
    let chunk = 4096usize;
    let chunks = 16usize;
    let total = (chunks * chunk) as u64;
    let source = RendezvousSource {
        path: PathBuf::from("/mem/f1"),
        barrier: Barrier::new(chunks),
        buffers: Mutex::new(Vec::new()),
    };
    let mut reader = ChunkedReader::new(ReadMode::Parallel, chunk, 4096, total).unwrap();
    let outcome = reader.read_all(&source, total).unwrap();
    assert_eq!(outcome.bytes, total);
    assert_eq!(outcome.chunk_reads, chunks as u64);

    // All buffers were alive at the barrier, so each task had its own.
    let mut buffers = source.buffers.lock().unwrap().clone();
    buffers.sort_unstable();
    buffers.dedup();
    assert_eq!(buffers.len(), chunks);
    assert!(buffers.iter().all(|&addr| addr % 4096 == 0));
}

#[test]
fn test_parallel_short_chunk_fails_whole_read() {
    let chunk = 4096usize;
    let total = 4 * chunk as u64;
    let mut source = MemSource::new(total as usize);
    source.short_at = Some(8192);
    let mut reader = ChunkedReader::new(ReadMode::Parallel, chunk, 4096, total).unwrap();
    let err = reader.read_all(&source, total).unwrap_err();
    match err.kind() {
        ErrorKind::PartialRead {
            offset,
            expected,
            actual,
            ..
        } => {
            assert_eq!(*offset, 8192);
            assert_eq!(*expected, chunk);
            assert_eq!(*actual, chunk / 2);
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn test_parallel_truncated_file_fails() {
    // The file on disk is shorter than the configured size: the last chunk
    // reads zero bytes, which must not be reported as success.
    let chunk = 4096usize;
    let total = 4 * chunk as u64;
    let source = MemSource::new(3 * chunk);
    let mut reader = ChunkedReader::new(ReadMode::Parallel, chunk, 4096, total).unwrap();
    let err = reader.read_all(&source, total).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::PartialRead { actual: 0, .. }));
}

#[test]
fn test_parallel_requires_divisible_chunk() {
    let err = ChunkedReader::new(ReadMode::Parallel, 3 * 4096, 4096, 16384).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

    let source = MemSource::new(16384);
    let mut reader = ChunkedReader::new(ReadMode::Parallel, 4096, 4096, 16384).unwrap();
    let err = reader.read_all(&source, 16384 + 4096 / 2).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
}

#[test]
fn test_chunk_size_validation() {
    for (chunk, alignment) in [(0, 4096), (1000, 512), (4096, 3000)] {
        let err = ChunkedReader::new(ReadMode::Sequential, chunk, alignment, 4096).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }
}

#[test]
fn test_skip_issues_no_reads() {
    let source = MemSource::new(4096);
    let mut reader = ChunkedReader::new(ReadMode::Skip, 4096, 4096, 4096).unwrap();
    assert_eq!(reader.read_all(&source, 4096).unwrap(), ReadOutcome::default());
    assert_eq!(source.cursor_reads.load(Ordering::SeqCst), 0);
    assert!(source.offsets.lock().unwrap().is_empty());
}

#[test]
fn test_read_mode_from_flags() {
    assert_eq!(ReadMode::from_flags(false, false), ReadMode::Sequential);
    assert_eq!(ReadMode::from_flags(false, true), ReadMode::Parallel);
    assert_eq!(ReadMode::from_flags(true, true), ReadMode::Skip);
    assert_eq!(ReadMode::from_flags(true, false), ReadMode::Skip);
}

#[test]
fn test_real_file_sequential_and_parallel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f1");
    let size = 64 * 1024u64;
    std::fs::write(&path, vec![0x42u8; size as usize]).unwrap();

    let opener = DirectIoOpener::new(IoMode::Unbuffered);
    for mode in [ReadMode::Sequential, ReadMode::Parallel] {
        let mut reader = ChunkedReader::new(mode, 16 * 1024, 4096, size).unwrap();
        let file = opener.open(&path).unwrap();
        let outcome = reader.read_all(&file, size).unwrap();
        assert_eq!(outcome.bytes, size);
        assert_eq!(outcome.chunk_reads, 4);
        file.close();
    }
}
