use nes::nametable::Mirroring;
use nesrom::ines::{HEADER_LEN, Header};
use nesrom::prg::{FILL, PRG_SIZE, Prg};
use nesrom::pack_file;

const SHT_PROGBITS: u32 = 1;
const SHT_SYMTAB: u32 = 2;
const SHT_STRTAB: u32 = 3;
const SHN_ABS: u16 = 0xfff1;
const EM_MOS: u16 = 6502;

/// Just enough of an ELF32 writer to stand in for what the linker emits:
/// sections with addresses, and absolute symbols.
#[derive(Default)]
struct TestElf {
    sections: Vec<(&'static str, u32, Vec<u8>)>,
    symbols: Vec<(&'static str, u32)>,
}

fn put16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn add_name(table: &mut Vec<u8>, name: &str) -> u32 {
    let at = table.len() as u32;
    table.extend_from_slice(name.as_bytes());
    table.push(0);
    at
}

impl TestElf {
    fn section(mut self, name: &'static str, addr: u32, bytes: &[u8]) -> Self {
        self.sections.push((name, addr, bytes.to_vec()));
        self
    }

    fn symbol(mut self, name: &'static str, value: u32) -> Self {
        self.symbols.push((name, value));
        self
    }

    fn build(&self) -> Vec<u8> {
        let mut shstrtab = vec![0];
        let mut strtab = vec![0];
        let mut symtab = vec![0; 16];
        for (name, value) in &self.symbols {
            put32(&mut symtab, add_name(&mut strtab, name));
            put32(&mut symtab, *value);
            put32(&mut symtab, 0);
            symtab.push(0x10); // global, no type
            symtab.push(0);
            put16(&mut symtab, SHN_ABS);
        }

        // (name offset, type, addr, file offset, size, link, entsize)
        let mut headers = vec![(0, 0, 0, 0, 0, 0, 0)];
        let mut out = vec![0; 52];
        for (name, addr, bytes) in &self.sections {
            let name = add_name(&mut shstrtab, name);
            headers.push((name, SHT_PROGBITS, *addr, out.len() as u32, bytes.len() as u32, 0, 0));
            out.extend_from_slice(bytes);
        }
        let strtab_index = headers.len() as u32 + 1;
        let name = add_name(&mut shstrtab, ".symtab");
        headers.push((name, SHT_SYMTAB, 0, out.len() as u32, symtab.len() as u32, strtab_index, 16));
        out.extend_from_slice(&symtab);
        let name = add_name(&mut shstrtab, ".strtab");
        headers.push((name, SHT_STRTAB, 0, out.len() as u32, strtab.len() as u32, 0, 0));
        out.extend_from_slice(&strtab);
        let name = add_name(&mut shstrtab, ".shstrtab");
        headers.push((name, SHT_STRTAB, 0, out.len() as u32, 0, 0, 0));
        let shstrtab_index = headers.len() - 1;
        // the name table's own name is in it, so size it last
        headers[shstrtab_index].4 = shstrtab.len() as u32;
        out.extend_from_slice(&shstrtab);

        while out.len() % 4 != 0 {
            out.push(0);
        }
        let shoff = out.len() as u32;
        for (name, kind, addr, offset, size, link, entsize) in &headers {
            put32(&mut out, *name);
            put32(&mut out, *kind);
            put32(&mut out, 0); // flags
            put32(&mut out, *addr);
            put32(&mut out, *offset);
            put32(&mut out, *size);
            put32(&mut out, *link);
            put32(&mut out, 1); // info
            put32(&mut out, 1); // addralign
            put32(&mut out, *entsize);
        }

        let mut ehdr = vec![0x7f, b'E', b'L', b'F', 1, 1, 1];
        ehdr.resize(16, 0);
        put16(&mut ehdr, 2); // executable
        put16(&mut ehdr, EM_MOS);
        put32(&mut ehdr, 1);
        put32(&mut ehdr, 0x8000); // entry
        put32(&mut ehdr, 0); // no program headers
        put32(&mut ehdr, shoff);
        put32(&mut ehdr, 0);
        put16(&mut ehdr, 52);
        put16(&mut ehdr, 32);
        put16(&mut ehdr, 0);
        put16(&mut ehdr, 40);
        put16(&mut ehdr, headers.len() as u16);
        put16(&mut ehdr, shstrtab_index as u16);
        out[..52].copy_from_slice(&ehdr);

        out
    }
}

const VECTORS: [u8; 6] = [0x00, 0x81, 0x00, 0x80, 0x02, 0x81];

fn minimal_rom() -> TestElf {
    TestElf::default()
        .section(".text", 0x8000, &[0x78, 0xd8, 0xa2, 0xff, 0x9a])
        .section(".rodata", 0x8100, b"No cart loaded\0")
        .section(".vector_table", 0xfffa, &VECTORS)
}

#[test]
fn packs_static_sections_at_their_address() {
    let prg = Prg::from_elf(&minimal_rom().build()).unwrap();

    assert_eq!(prg.bytes.len(), PRG_SIZE);
    assert_eq!(&prg.bytes[..5], &[0x78, 0xd8, 0xa2, 0xff, 0x9a]);
    assert_eq!(prg.bytes[5], FILL);
    assert_eq!(&prg.bytes[0x100..0x10f], b"No cart loaded\0");
    assert_eq!(&prg.bytes[PRG_SIZE - 6..], &VECTORS);
    assert_eq!(prg.reset_vector(), 0x8000);
    assert_eq!(prg.free(), PRG_SIZE - 5 - 15 - 6);
}

#[test]
fn loaded_sections_go_to_their_load_symbol() {
    let elf = minimal_rom()
        .section(".data", 0x0300, &[1, 2, 3])
        .symbol("__data_load", 0x8200)
        .build();
    let prg = Prg::from_elf(&elf).unwrap();

    assert_eq!(&prg.bytes[0x200..0x203], &[1, 2, 3]);
    let data = prg.sections.iter().find(|s| s.display_name == ".data").unwrap();
    assert_eq!(data.rom_addr, 0x8200);
    assert_eq!(data.mem_addr, 0x0300);
}

#[test]
fn loaded_section_without_load_symbol_is_an_error() {
    let elf = minimal_rom().section(".zp", 0x0040, &[9]).symbol("__data_load", 0x8200).build();
    let err = Prg::from_elf(&elf).err().unwrap();
    assert!(format!("{err:#}").contains("__zp_load"), "{err:#}");
}

#[test]
fn missing_vectors_is_an_error() {
    let elf = TestElf::default().section(".text", 0x8000, &[0xea]).build();
    assert!(Prg::from_elf(&elf).is_err());
}

#[test]
fn not_an_elf() {
    assert!(Prg::from_elf(b"NES\x1a but not really").is_err());
}

#[test]
fn writes_header_prg_and_chr() {
    let dir = tempfile::tempdir().unwrap();
    let elf_path = dir.path().join("nocart.elf");
    let chr_path = dir.path().join("tiles.chr");
    let out_path = dir.path().join("nocart.nes");
    std::fs::write(&elf_path, minimal_rom().build()).unwrap();
    std::fs::write(&chr_path, vec![0x55; 0x2000]).unwrap();

    pack_file(&elf_path, Some(&chr_path), &out_path, Mirroring::Vertical).unwrap();

    let image = std::fs::read(&out_path).unwrap();
    assert_eq!(image.len(), HEADER_LEN + 0x8000 + 0x2000);
    assert_eq!(&image[..8], &[b'N', b'E', b'S', 0x1a, 2, 1, 0x01, 0x00]);
    let header = Header::parse(&image).unwrap();
    assert_eq!(header.mirroring, Mirroring::Vertical);
    assert_eq!(image[HEADER_LEN], 0x78);
    assert_eq!(image[HEADER_LEN + PRG_SIZE], 0x55);
}

#[test]
fn no_chr_means_chr_ram() {
    let dir = tempfile::tempdir().unwrap();
    let elf_path = dir.path().join("nocart.elf");
    let out_path = dir.path().join("nocart.nes");
    std::fs::write(&elf_path, minimal_rom().build()).unwrap();

    let image = pack_file(&elf_path, None, &out_path, Mirroring::Horizontal).unwrap();

    assert!(image.header.uses_chr_ram());
    let bytes = std::fs::read(&out_path).unwrap();
    assert_eq!(bytes.len(), HEADER_LEN + PRG_SIZE);
    assert_eq!(bytes[6], 0x00);
}

#[test]
fn odd_sized_chr_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let elf_path = dir.path().join("nocart.elf");
    let chr_path = dir.path().join("tiles.chr");
    let out_path = dir.path().join("nocart.nes");
    std::fs::write(&elf_path, minimal_rom().build()).unwrap();
    std::fs::write(&chr_path, vec![0; 1000]).unwrap();

    assert!(pack_file(&elf_path, Some(&chr_path), &out_path, Mirroring::Vertical).is_err());
    assert!(!out_path.exists());
}

#[test]
fn missing_input_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let elf_path = dir.path().join("missing.elf");
    let err = pack_file(&elf_path, None, &dir.path().join("x.nes"), Mirroring::Vertical)
        .err()
        .unwrap();
    assert!(err.to_string().contains("missing.elf"), "{err}");
}
