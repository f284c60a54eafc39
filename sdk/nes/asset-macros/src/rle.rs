/// Runs shorter than this are cheaper as literals than as `byte tag n`.
const MIN_RUN: usize = 3;

/// Compress `raw` into a `vram_unrle` stream, ending with `tag 0`.
///
/// The tag is the lowest byte value that does not occur in `raw`.
pub fn encode(raw: &[u8]) -> Result<Vec<u8>, String> {
    let mut used = [false; 256];
    for &b in raw {
        used[b as usize] = true;
    }
    let tag = used
        .iter()
        .position(|&u| !u)
        .ok_or("all 256 byte values occur, no free rle tag")? as u8;

    let mut out = vec![tag];
    let mut i = 0;
    while i < raw.len() {
        let byte = raw[i];
        let run = raw[i..].iter().take_while(|&&b| b == byte).count();

        out.push(byte);
        let mut repeats = run - 1;
        if run < MIN_RUN {
            out.extend(std::iter::repeat(byte).take(repeats));
        } else {
            while repeats > 0 {
                let n = repeats.min(255);
                out.push(tag);
                out.push(n as u8);
                repeats -= n;
            }
        }
        i += run;
    }

    out.push(tag);
    out.push(0);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_unused_tag() {
        assert_eq!(encode(&[0, 1, 3]).unwrap()[0], 2);
    }

    #[test]
    fn short_repeats_stay_literal() {
        assert_eq!(encode(&[5, 5, 7]).unwrap(), vec![0, 5, 5, 7, 0, 0]);
    }

    #[test]
    fn long_runs_split_at_255_repeats() {
        let raw = vec![9u8; 300];
        // 9, then 255 + 44 repeats
        assert_eq!(encode(&raw).unwrap(), vec![0, 9, 0, 255, 0, 44, 0, 0]);
    }

    #[test]
    fn blank_nametable_is_tiny() {
        let raw = vec![0x20u8; 1024];
        assert_eq!(encode(&raw).unwrap().len(), 1 + 1 + 2 * 5 + 2);
    }

    #[test]
    fn refuses_when_every_byte_is_used() {
        let raw: Vec<u8> = (0..=255).collect();
        assert!(encode(&raw).is_err());
    }
}
