//! Layout module: compile enabled channels into a scan record layout.

use crate::channel::ChannelDescriptor;
use crate::error::{Error, Result};
use crate::invariant_ppt::{assert_invariant, LAYOUT_ALIGNED, LAYOUT_MONOTONIC};

/// A channel placed within a scan record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLayout {
    pub descriptor: ChannelDescriptor,
    /// Offset of the storage word from the start of the record.
    pub byte_offset: usize,
}

/// The compiled layout: channels in scan order plus the record size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLayout {
    pub channels: Vec<ChannelLayout>,
    pub record_size: usize,
}

impl ScanLayout {
    /// Compute offsets for `(scan_index, descriptor)` pairs.
    ///
    /// Channels are placed in ascending index order, each at the smallest
    /// offset that is a multiple of its own storage width. The index only
    /// orders channels; gaps between indices do not reserve space.
    pub fn compute<I>(channels: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, ChannelDescriptor)>,
    {
        let mut ordered: Vec<(u32, ChannelDescriptor)> = channels.into_iter().collect();
        ordered.sort_by_key(|(index, _)| *index);

        for pair in ordered.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(Error::DuplicateIndex {
                    index: pair[0].0,
                    first: pair[0].1.id.clone(),
                    second: pair[1].1.id.clone(),
                });
            }
        }

        let mut size = 0usize;
        let mut placed = Vec::with_capacity(ordered.len());
        for (_, descriptor) in ordered {
            let storage = descriptor.storage_bytes as usize;
            let byte_offset = align_up(size, storage);
            assert_invariant(
                LAYOUT_ALIGNED,
                byte_offset % storage == 0 && byte_offset >= size,
                "channel offset is naturally aligned",
                Some(&descriptor.id),
            );
            size = byte_offset + storage;
            placed.push(ChannelLayout {
                descriptor,
                byte_offset,
            });
        }

        assert_invariant(
            LAYOUT_MONOTONIC,
            placed.windows(2).all(|w| w[0].byte_offset < w[1].byte_offset),
            "offsets increase in scan order",
            Some("ScanLayout::compute"),
        );

        Ok(Self {
            channels: placed,
            record_size: size,
        })
    }

    /// Look up a placed channel by id.
    pub fn channel(&self, id: &str) -> Option<&ChannelLayout> {
        self.channels.iter().find(|c| c.descriptor.id == id)
    }

    /// Fails with `MissingChannel` unless `id` is part of the scan.
    pub fn require(&self, id: &str) -> Result<&ChannelLayout> {
        self.channel(id).ok_or_else(|| Error::MissingChannel {
            channel: id.to_string(),
        })
    }
}

fn align_up(size: usize, align: usize) -> usize {
    match size % align {
        0 => size,
        rem => size + (align - rem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chan(id: &str, text: &str) -> ChannelDescriptor {
        ChannelDescriptor::parse(id, text).unwrap()
    }

    #[test]
    fn pads_to_natural_alignment() {
        let layout = ScanLayout::compute([
            (0, chan("a", "le:s16/16>>0")),
            (1, chan("b", "le:s32/32>>0")),
            (2, chan("c", "le:s16/16>>0")),
        ])
        .unwrap();
        let offsets: Vec<usize> = layout.channels.iter().map(|c| c.byte_offset).collect();
        assert_eq!(offsets, vec![0, 4, 8]);
        assert_eq!(layout.record_size, 10);
    }

    #[test]
    fn orders_by_index_not_declaration() {
        let layout = ScanLayout::compute([
            (3, chan("in_timestamp", "le:s64/64>>0")),
            (1, chan("in_accel_y", "le:s16/32>>0")),
            (0, chan("in_accel_x", "le:s16/32>>0")),
            (2, chan("in_accel_z", "le:s16/32>>0")),
        ])
        .unwrap();
        let ids: Vec<&str> = layout
            .channels
            .iter()
            .map(|c| c.descriptor.id.as_str())
            .collect();
        assert_eq!(ids, ["in_accel_x", "in_accel_y", "in_accel_z", "in_timestamp"]);
        assert_eq!(layout.channel("in_timestamp").unwrap().byte_offset, 16);
        assert_eq!(layout.record_size, 24);
    }

    #[test]
    fn rejects_duplicate_index() {
        let err = ScanLayout::compute([
            (0, chan("in_accel_x", "le:s16/32>>0")),
            (0, chan("in_accel_y", "le:s16/32>>0")),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateIndex { index: 0, .. }));
    }

    #[test]
    fn empty_layout_has_zero_size() {
        let layout = ScanLayout::compute(Vec::new()).unwrap();
        assert!(layout.channels.is_empty());
        assert_eq!(layout.record_size, 0);
    }

    #[test]
    fn require_reports_missing_channel() {
        let layout = ScanLayout::compute([(0, chan("in_accel_x", "le:s16/32>>0"))]).unwrap();
        assert!(layout.require("in_accel_x").is_ok());
        assert!(matches!(
            layout.require("in_accel_y"),
            Err(Error::MissingChannel { .. })
        ));
    }
}
