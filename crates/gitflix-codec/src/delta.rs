//! Run-length delta transform between consecutive frames.
//!
//! The transform walks the two flat pixel streams in lockstep and emits a
//! command stream:
//!
//! ```text
//! 0x00 <len>              — <len> bytes identical to the predecessor
//! 0x01 <len> <d0..dlen-1> — <len> differing bytes, each a signed-8-bit delta
//! ```
//!
//! Runs are capped at 255 so lengths fit one byte; the encoded stream is at
//! most twice the frame size. Replay starts from a copy of the predecessor,
//! skips identical runs, and adds sign-extended deltas with clamping into
//! `[0, 255]`. Clamping never fires on streams this encoder produced: any
//! difference outside the signed range aborts the transform and the frame
//! degrades to RAW instead.

use crate::error::{CodecError, CodecResult};

/// Command: run of bytes identical to the predecessor.
const CMD_SAME: u8 = 0x00;
/// Command: run of differing bytes, followed by their deltas.
const CMD_DIFF: u8 = 0x01;
/// Run lengths must fit in one byte.
const MAX_RUN: usize = 255;

/// Encode `cur` against `prev` as a command stream.
///
/// Both slices must be the same length (callers verify geometry first).
/// Fails with [`CodecError::DeltaRange`] on the first byte whose difference
/// does not fit in a signed 8-bit value.
pub fn transform(prev: &[u8], cur: &[u8]) -> CodecResult<Vec<u8>> {
    debug_assert_eq!(prev.len(), cur.len());
    let n = cur.len();
    let mut out = Vec::with_capacity(2 * n);
    let mut i = 0;

    while i < n {
        let mut same = 0;
        while i + same < n && cur[i + same] == prev[i + same] && same < MAX_RUN {
            same += 1;
        }
        if same > 0 {
            out.push(CMD_SAME);
            out.push(same as u8);
            i += same;
            continue;
        }

        let mut diff = 0;
        while i + diff < n && cur[i + diff] != prev[i + diff] && diff < MAX_RUN {
            diff += 1;
        }
        out.push(CMD_DIFF);
        out.push(diff as u8);
        for k in 0..diff {
            let d = cur[i + k] as i16 - prev[i + k] as i16;
            if !(-128..=127).contains(&d) {
                return Err(CodecError::DeltaRange { offset: i + k });
            }
            out.push(cur[i + k].wrapping_sub(prev[i + k]));
        }
        i += diff;
    }

    Ok(out)
}

/// Replay a command stream against the predecessor's pixels.
///
/// Returns the reconstructed frame buffer, always exactly `prev.len()`
/// bytes. Rejects streams that end mid-command, overrun the frame, carry
/// unknown commands, or leave trailing bytes after covering the frame.
pub fn apply(commands: &[u8], prev: &[u8]) -> CodecResult<Vec<u8>> {
    let n = prev.len();
    let mut out = prev.to_vec();
    let mut pos = 0;
    let mut cursor = 0;

    while pos < commands.len() {
        if cursor == n {
            return Err(CodecError::CorruptStream {
                offset: pos,
                reason: "trailing data after full frame".into(),
            });
        }
        let cmd = commands[pos];
        let Some(&len) = commands.get(pos + 1) else {
            return Err(CodecError::TruncatedStream { offset: pos });
        };
        let len = len as usize;
        pos += 2;

        if cursor + len > n {
            return Err(CodecError::CorruptStream {
                offset: pos - 1,
                reason: format!("run of {len} overruns frame at byte {cursor}"),
            });
        }

        match cmd {
            CMD_SAME => cursor += len,
            CMD_DIFF => {
                if pos + len > commands.len() {
                    return Err(CodecError::TruncatedStream {
                        offset: commands.len(),
                    });
                }
                for k in 0..len {
                    let d = commands[pos + k] as i8;
                    let v = out[cursor + k] as i16 + d as i16;
                    out[cursor + k] = v.clamp(0, 255) as u8;
                }
                pos += len;
                cursor += len;
            }
            other => {
                return Err(CodecError::CorruptStream {
                    offset: pos - 2,
                    reason: format!("unknown command byte {other:#04x}"),
                })
            }
        }
    }

    if cursor != n {
        return Err(CodecError::TruncatedStream {
            offset: commands.len(),
        });
    }
    Ok(out)
}
