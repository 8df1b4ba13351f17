use super::AudioBuffer;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Encode a capture buffer as 16-bit PCM WAV, in memory.
///
/// The spec mirrors whatever format the input device delivered; no
/// resampling happens here.
pub fn encode(buffer: &AudioBuffer) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: buffer.channels.max(1),
        sample_rate: buffer.sample_rate.max(1),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in &buffer.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// File extension matching the container `encode` produces.
pub const EXTENSION: &str = "wav";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn buffer_with(samples: Vec<i16>, sample_rate: u32, channels: u16) -> AudioBuffer {
        let mut buf = AudioBuffer::new(sample_rate, channels);
        buf.append(&samples);
        buf
    }

    #[test]
    fn encodes_roundtrippable_wav() {
        let samples: Vec<i16> = (0..1600).map(|i| (i % 100) as i16).collect();
        let buf = buffer_with(samples.clone(), 16_000, 1);

        let bytes = encode(&buf).expect("encode");
        let reader = hound::WavReader::new(Cursor::new(bytes)).expect("parse");

        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 16_000);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);

        let decoded: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<_, _>>()
            .expect("samples");
        assert_eq!(decoded, samples);
    }

    #[test]
    fn encoded_file_opens_from_disk() {
        let buf = buffer_with(vec![100i16; 480], 48_000, 2);
        let bytes = encode(&buf).expect("encode");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("segment-0-10.wav");
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(&bytes).expect("write");
        drop(file);

        let reader = hound::WavReader::open(&path).expect("open");
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 48_000);
        assert_eq!(reader.len(), 480);
    }

    #[test]
    fn empty_buffer_encodes_header_only() {
        let buf = AudioBuffer::new(16_000, 1);
        let bytes = encode(&buf).expect("encode");
        let reader = hound::WavReader::new(Cursor::new(bytes)).expect("parse");
        assert_eq!(reader.len(), 0);
    }
}
