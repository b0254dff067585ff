use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use bytes::BytesMut;
use tracing::{debug, info};

use eolchan_translate::{translate_output, ChannelFlags, EolChannel, TranslationMode};
use eolchan_transport::{ByteStream, RawStream};

use crate::cmd::ConvertArgs;
use crate::exit::{channel_error, io_error, CliResult, SUCCESS};

pub fn run(args: ConvertArgs) -> CliResult<i32> {
    let canonical = if args.input == Path::new("-") {
        let mut raw = Vec::new();
        std::io::stdin()
            .read_to_end(&mut raw)
            .map_err(|err| io_error("reading stdin", err))?;
        canonicalize(Cursor::new(raw), args.in_mode)?
    } else {
        let file = File::open(&args.input)
            .map_err(|err| io_error(&format!("opening {}", args.input.display()), err))?;
        canonicalize(ByteStream::from_file(file), args.in_mode)?
    };

    let mut flags = ChannelFlags::default();
    let mut encoded = BytesMut::new();
    let written = translate_output(args.out_mode, &mut flags, &canonical, &mut encoded);
    debug!(read = canonical.len(), written, "translation complete");

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .map_err(|err| io_error(&format!("creating {}", path.display()), err))?;
            file.write_all(&encoded)
                .map_err(|err| io_error(&format!("writing {}", path.display()), err))?;
        }
        None => crate::output::print_raw(&encoded),
    }

    info!(
        input = %args.input.display(),
        in_mode = args.in_mode.as_str(),
        out_mode = args.out_mode.as_str(),
        bytes_out = encoded.len(),
        "convert finished"
    );
    Ok(SUCCESS)
}

/// Drain a stream through an input-translating channel, producing the
/// canonical-form bytes.
fn canonicalize<T: RawStream>(stream: T, mode: TranslationMode) -> CliResult<Vec<u8>> {
    let mut channel = EolChannel::with_modes(stream, mode, TranslationMode::Binary);
    let mut buf = BytesMut::new();
    loop {
        match channel.populate_line_buffer(&mut buf) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => return Err(channel_error("reading input", err)),
        }
    }
    Ok(buf.to_vec())
}
