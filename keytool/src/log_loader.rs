use crate::errors::WithPath;
use anyhow::{bail, Result};
use libflate::gzip::Decoder;
use rand::{thread_rng, Rng};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::marker::PhantomData;
use std::path::Path;
use std::time::{Duration, Instant};

struct ChunkLoader<T> {
    start: Instant,
    logs: <Vec<String> as IntoIterator>::IntoIter,
    sample: f64,
    chunk_size: usize,
    current: Option<AnyLoader>,
    _marker: PhantomData<*const T>,
}

impl<T> ChunkLoader<T> {
    fn elapsed(&self) -> Duration {
        Instant::now() - self.start
    }
}

impl<T: DeserializeOwned> Iterator for ChunkLoader<T> {
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Result<Vec<T>>> {
        loop {
            match &mut self.current {
                Some(current) => match current.load_chunk(self.sample, self.chunk_size) {
                    Ok(Some(chunk)) => {
                        println!("{:?} Loaded {} requests", self.elapsed(), chunk.len());
                        return Some(Ok(chunk));
                    }
                    Ok(None) => self.current = None,
                    Err(e) => return Some(Err(e)),
                },
                None => match self.logs.next() {
                    Some(log) => {
                        println!("{:?} Loading file: {}", self.elapsed(), &log);
                        match AnyLoader::new(&log) {
                            Ok(loader) => self.current = Some(loader),
                            Err(e) => return Some(Err(e)),
                        }
                    }
                    None => {
                        println!("{:?} Finished", self.elapsed());
                        return None;
                    }
                },
            }
        }
    }
}

/// Streams every log in `logs` as chunks of at most `CHUNK_SIZE_HINT`
/// entries, keeping each entry with probability `sample`.
///
/// Logs are JSON lines, one request per line, either plain (`.jsonl`) or
/// gzipped (`.gz`). Blank lines are skipped.
pub fn load_all_chunks<T: DeserializeOwned>(
    logs: &[String],
    sample: f64,
) -> impl Iterator<Item = Result<Vec<T>>> {
    load_chunks(logs, sample, crate::CHUNK_SIZE_HINT)
}

fn load_chunks<T: DeserializeOwned>(
    logs: &[String],
    sample: f64,
    chunk_size: usize,
) -> impl Iterator<Item = Result<Vec<T>>> {
    println!();

    ChunkLoader {
        start: Instant::now(),
        logs: logs.to_vec().into_iter(),
        sample,
        chunk_size,
        current: None,
        _marker: PhantomData,
    }
}

enum AnyLoader {
    Gz(JsonLinesLoader<Decoder<File>>),
    Json(JsonLinesLoader<File>),
}

impl AnyLoader {
    fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = WithPath::context(&path, |p| File::open(p))?;
        let loader = match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Self::Gz(JsonLinesLoader::new(Decoder::new(file)?)),
            Some("jsonl") => Self::Json(JsonLinesLoader::new(file)),
            _ => bail!(
                "Expecting a .jsonl or .gz request log, got {}",
                path.as_ref().display()
            ),
        };
        Ok(loader)
    }

    fn load_chunk<T: DeserializeOwned>(
        &mut self,
        sample: f64,
        chunk_size: usize,
    ) -> Result<Option<Vec<T>>> {
        match self {
            Self::Json(inner) => inner.load_chunk(sample, chunk_size),
            Self::Gz(inner) => inner.load_chunk(sample, chunk_size),
        }
    }
}

struct JsonLinesLoader<R> {
    lines: Lines<BufReader<R>>,
}

impl<R: Read> JsonLinesLoader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    fn load_chunk<T: DeserializeOwned>(
        &mut self,
        sample: f64,
        chunk_size: usize,
    ) -> Result<Option<Vec<T>>> {
        let mut rand = thread_rng();
        let mut result = Vec::new();

        for line in &mut self.lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if sample < 1.0 && rand.gen::<f64>() >= sample {
                continue;
            }

            result.push(serde_json::from_str(&line)?);

            if result.len() == chunk_size {
                break;
            }
        }

        Ok(if result.is_empty() { None } else { Some(result) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libflate::gzip::Encoder;
    use std::io::Write;
    use tempfile::{tempdir, TempDir};

    fn write_log(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_owned()
    }

    fn write_gz_log(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        let mut encoder = Encoder::new(File::create(&path).unwrap()).unwrap();
        encoder.write_all(contents.as_bytes()).unwrap();
        encoder.finish().into_result().unwrap();
        path.to_str().unwrap().to_owned()
    }

    fn chunks(logs: &[String], sample: f64, chunk_size: usize) -> Vec<Vec<u32>> {
        load_chunks(logs, sample, chunk_size)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn jsonl_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let log = write_log(&dir, "requests.jsonl", "1\n\n2\n   \n3\n");
        assert_eq!(vec![vec![1, 2, 3]], chunks(&[log], 1.0, 10));
    }

    #[test]
    fn gz_is_decompressed() {
        let dir = tempdir().unwrap();
        let log = write_gz_log(&dir, "requests.jsonl.gz", "4\n5\n\n6\n");
        assert_eq!(vec![vec![4, 5, 6]], chunks(&[log], 1.0, 10));
    }

    #[test]
    fn logs_are_read_in_order() {
        let dir = tempdir().unwrap();
        let logs = vec![
            write_gz_log(&dir, "a.gz", "1\n2\n"),
            write_log(&dir, "b.jsonl", "3\n"),
        ];
        assert_eq!(vec![vec![1, 2], vec![3]], chunks(&logs, 1.0, 10));
    }

    #[test]
    fn chunks_are_bounded() {
        let dir = tempdir().unwrap();
        let log = write_log(&dir, "requests.jsonl", "1\n2\n3\n4\n5\n");
        assert_eq!(
            vec![vec![1, 2], vec![3, 4], vec![5]],
            chunks(&[log], 1.0, 2)
        );
    }

    #[test]
    fn zero_sample_loads_nothing() {
        let dir = tempdir().unwrap();
        let log = write_log(&dir, "requests.jsonl", "1\n2\n3\n");
        assert!(chunks(&[log], 0.0, 10).is_empty());
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = tempdir().unwrap();
        for name in &["requests.json", "requests.txt", "requests"] {
            let log = write_log(&dir, name, "1\n");
            let mut loaded = load_chunks::<u32>(&[log], 1.0, 10);
            assert!(matches!(loaded.next(), Some(Err(_))));
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("missing.jsonl").to_str().unwrap().to_owned();
        let mut loaded = load_chunks::<u32>(&[log], 1.0, 10);
        assert!(matches!(loaded.next(), Some(Err(_))));
    }

    #[test]
    fn malformed_line_is_an_error() {
        let dir = tempdir().unwrap();
        let log = write_log(&dir, "requests.jsonl", "1\nnot json\n");
        let mut loaded = load_chunks::<u32>(&[log], 1.0, 10);
        assert!(matches!(loaded.next(), Some(Err(_))));
    }
}
