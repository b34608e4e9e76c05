use crate::{InputBatch, SyncError};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use vislab_resources::ResourceRequest;

/// The authoritative per-frame state produced by the master before the sync
/// point and read-only on every node afterwards.
///
/// Lifetime is exactly one frame: the snapshot is overwritten wholesale each
/// frame and never partially updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Simulation time in seconds.
    pub current_time: f64,
    pub camera_position: Vec3,
    pub camera_orientation: Quat,
    pub pick_matrix: Mat4,
    /// Input events accumulated on the master since the previous frame.
    pub input: InputBatch,
    /// Synchronized resource creations to realize on every node this frame.
    pub resources: Vec<ResourceRequest>,
}

impl FrameSnapshot {
    /// Serialize to CBOR and compress. The wire encoding mirrors the
    /// `.cbor.zst` convention used for on-disk state elsewhere.
    pub fn encode(&self) -> Result<Vec<u8>, SyncError> {
        let mut cbor = Vec::new();
        ciborium::into_writer(self, &mut cbor).map_err(|e| SyncError::Encode(e.to_string()))?;

        let mut encoder =
            zstd::Encoder::new(Vec::new(), 3).map_err(|e| SyncError::Encode(e.to_string()))?;
        encoder
            .write_all(&cbor)
            .map_err(|e| SyncError::Encode(e.to_string()))?;
        encoder.finish().map_err(|e| SyncError::Encode(e.to_string()))
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(data: &[u8]) -> Result<Self, SyncError> {
        let mut decoder =
            zstd::Decoder::new(data).map_err(|e| SyncError::Decode(e.to_string()))?;
        let mut cbor = Vec::new();
        decoder
            .read_to_end(&mut cbor)
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        ciborium::from_reader(cbor.as_slice()).map_err(|e| SyncError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vislab_resources::ResourceKind;

    fn sample() -> FrameSnapshot {
        FrameSnapshot {
            current_time: 12.3456789,
            camera_position: Vec3::new(1.0, 2.5, -3.75),
            camera_orientation: Quat::from_rotation_y(0.7),
            pick_matrix: Mat4::perspective_rh_gl(1.0, 16.0 / 9.0, 0.1, 100.0).inverse(),
            input: InputBatch::default(),
            resources: vec![ResourceRequest {
                kind: ResourceKind::Texture,
                name: "tex_a".into(),
                data: vec![0x01, 0x02, 0x03],
            }],
        }
    }

    #[test]
    fn roundtrip_is_bit_identical() {
        let snapshot = sample();
        let decoded = FrameSnapshot::decode(&snapshot.encode().unwrap()).unwrap();

        assert_eq!(
            decoded.current_time.to_bits(),
            snapshot.current_time.to_bits()
        );
        for (a, b) in decoded
            .camera_position
            .to_array()
            .iter()
            .zip(snapshot.camera_position.to_array())
        {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        for (a, b) in decoded
            .camera_orientation
            .to_array()
            .iter()
            .zip(snapshot.camera_orientation.to_array())
        {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        for (a, b) in decoded
            .pick_matrix
            .to_cols_array()
            .iter()
            .zip(snapshot.pick_matrix.to_cols_array())
        {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn roundtrip_carries_resources_and_input() {
        let mut snapshot = sample();
        snapshot.input.keyboard.push(crate::KeyboardEvent {
            key: 65,
            scancode: 30,
            action: crate::KeyAction::Press,
            mods: 0,
        });

        let decoded = FrameSnapshot::decode(&snapshot.encode().unwrap()).unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.resources[0].data, vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            FrameSnapshot::decode(&[0xde, 0xad, 0xbe, 0xef]),
            Err(SyncError::Decode(_))
        ));
    }
}
