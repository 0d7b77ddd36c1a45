mod cli;

use std::error::Error;
use std::process::ExitCode;

use anon_mmap::config::SLOT_SIZE;
use anon_mmap::{ErrorKind, MapOptions, MappedRegion, page_size};
use clap::Parser;
use typed_bytesize::ByteSizeIec;

pub use self::cli::Cli;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = if cli.no_access {
        placeholder()
    } else {
        poke(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn poke(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let len = cli
        .slots
        .checked_mul(SLOT_SIZE)
        .ok_or("slot count overflows the address space")?;
    log::info!("slots={} len={}", cli.slots, ByteSizeIec(len as u64));

    let mut region = MappedRegion::new(len)?;
    println!("mmap(): OK");
    println!("{}", std::any::type_name::<[u8]>());
    println!("{}", region.read(0)?);

    region.write(0, cli.first)?;
    region.write(1, cli.second)?;
    let (first, second) = (region.read(0)?, region.read(1)?);
    println!("{first}");
    println!("{second}");

    if (first, second) != (cli.first, cli.second) {
        return Err(format!(
            "read back ({first}, {second}), expected ({}, {})",
            cli.first, cli.second
        )
        .into());
    }

    region.release()?;
    println!("munmap(): OK");
    Ok(())
}

fn placeholder() -> Result<(), Box<dyn Error>> {
    let mut region = MappedRegion::acquire(page_size(), MapOptions::new().no_access())?;
    println!("mmap(): OK");
    println!("{} mapped without access", ByteSizeIec(region.mapped_len() as u64));

    match region.read(0) {
        Err(err) if err.kind() == ErrorKind::AccessDenied => println!("{err}"),
        other => return Err(format!("placeholder page was readable: {other:?}").into()),
    }

    region.release()?;
    println!("munmap(): OK");
    Ok(())
}
