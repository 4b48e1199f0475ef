use packed_ints::{
    FAST, Format, FormatAndBits, GrowableWriter, Mutable, PackedIntsError, Reader, Version,
    decode, encode, get_reader,
};

fn main() {
    println!("=== Packed Ints Examples ===\n");

    // Example 1: Whole-sequence encode/decode
    let _ = example_document_lengths();

    // Example 2: Picking a layout for a width
    example_layouts();

    // Example 3: Growable writer
    let _ = example_growable();
}

fn example_document_lengths() -> Result<(), PackedIntsError> {
    println!("Example 1: Document lengths in 10 bits each");

    let lengths = [120u64, 987, 3, 640, 512, 77];
    let version = Version::CURRENT.id();

    let bytes = encode(Format::Packed, version, 10, &lengths)?;
    println!("  {} values -> {} bytes", lengths.len(), bytes.len());
    println!(
        "  Same values as Start version: {} bytes",
        Format::Packed.byte_count(Version::Start, lengths.len(), 10)
    );

    let back = decode(Format::Packed, version, 10, &bytes, lengths.len())?;
    println!("  Decoded: {:?}", back);
    println!();

    Ok(())
}

fn example_layouts() {
    println!("Example 2: Fastest layout within 50% overhead");

    for bpv in [3, 7, 11, 20, 30, 60] {
        let chosen = FormatAndBits::fastest(bpv, FAST);
        println!(
            "  {:>2} bits -> {:?} with {} bits",
            bpv, chosen.format, chosen.bits_per_value
        );
    }
    println!();
}

fn example_growable() -> Result<(), PackedIntsError> {
    println!("Example 3: Term frequencies that grow over time");

    let mut freqs = GrowableWriter::new(1, 8)?;
    for (doc, freq) in [(0, 1u64), (3, 5), (5, 300), (7, 70_000)] {
        freqs.set(doc, freq)?;
        println!(
            "  doc {} = {:>6}, now {} bits per value",
            doc,
            freq,
            freqs.bits_per_value()
        );
    }

    let bytes = freqs.to_bytes(Version::CURRENT.id())?;
    let reader = get_reader(
        freqs.format(),
        Version::CURRENT.id(),
        freqs.size(),
        freqs.bits_per_value(),
        &bytes,
    )?;
    println!("  Persisted {} bytes", bytes.len());
    println!("  Reloaded: {:?}", reader.iter().collect::<Vec<_>>());

    Ok(())
}
