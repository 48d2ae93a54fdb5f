use super::config::Config;
use eyre::Result;
use noodles::bgzf;
use std::io::Read;

/// Decompressing reader over the raw input.
pub enum Stream<R: Read + Send + Sync + 'static> {
    Raw(R),
    Gzip(flate2::read::MultiGzDecoder<R>),
    Bgzf(bgzf::io::Reader<R>),
    MultithreadedBgzf(bgzf::io::MultithreadedReader<R>),
}

impl<R: Read + Send + Sync + 'static> Stream<R> {
    pub fn new(inner: R, config: &Config) -> Result<Self> {
        let stream = match config {
            Config::Raw => Stream::Raw(inner),
            Config::Gzip => Stream::Gzip(flate2::read::MultiGzDecoder::new(inner)),
            Config::Bgzf(params) => {
                if params.threads().get() == 1 {
                    Stream::Bgzf(bgzf::io::Reader::new(inner))
                } else {
                    Stream::MultithreadedBgzf(bgzf::io::MultithreadedReader::with_worker_count(
                        *params.threads(),
                        inner,
                    ))
                }
            }
        };
        Ok(stream)
    }
}

impl<R: Read + Send + Sync + 'static> Read for Stream<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Stream::Raw(r) => r.read(buf),
            Stream::Gzip(r) => r.read(buf),
            Stream::Bgzf(r) => r.read(buf),
            Stream::MultithreadedBgzf(r) => r.read(buf),
        }
    }
}
