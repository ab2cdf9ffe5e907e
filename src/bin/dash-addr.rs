use clap::Parser;
use dash_address_codec::{
    global_registry, AddressInfo, NetworksConfig, Wif, WifInfo,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file of custom networks to register before running
    #[clap(long, global = true)]
    networks: Option<PathBuf>,

    /// Default network (mainnet, testnet3, regtest or a custom name)
    #[clap(long, global = true, default_value = "mainnet")]
    network: String,

    /// Print JSON instead of text
    #[clap(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v, -vv, ...)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
pub enum Command {
    /// Decode an address (base58check, bech32/bech32m or hex public key)
    Decode {
        /// The address to decode
        address: String,
    },
    /// Encode a hex private key as WIF
    EncodeWif {
        /// 32-byte private key in hex
        key: String,

        /// Mark the key for uncompressed public key serialization
        #[clap(long, short)]
        uncompressed: bool,
    },
    /// Decode a WIF private key
    DecodeWif {
        /// The WIF string to decode
        wif: String,
    },
    /// List registered networks
    Networks,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    stderrlog::new()
        .module("dash_address_codec")
        .verbosity(cli.verbose as usize + 1)
        .init()?;

    if let Some(path) = &cli.networks {
        NetworksConfig::from_file(path)?.register_global()?;
    }

    let registry = global_registry();
    let network = registry.resolve(&cli.network)?;

    match cli.command {
        Command::Decode { address } => {
            let address = registry.decode_address(address.trim(), &network)?;
            let info = AddressInfo::new(&address, &registry);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Decoded address:");
                println!("Type: {}", info.kind);
                println!("Address: {}", info.address);
                if info.encoded != info.address {
                    println!("Encoded: {}", info.encoded);
                }
                println!("Network: {}", info.network.as_deref().unwrap_or("unknown"));
                if let Some(version) = info.version_byte {
                    println!("Version byte: 0x{:02x}", version);
                }
                if let Some(hrp) = &info.hrp {
                    println!("HRP: {}", hrp);
                }
                if let Some(version) = info.witness_version {
                    println!("Witness version: {}", version);
                }
                if let Some(format) = info.pub_key_format {
                    println!("Public key format: {}", format);
                }
                println!("Script address: {}", info.script_address);
                println!(
                    "For {}: {}",
                    network.name(),
                    if address.is_for_net(&network) { "yes" } else { "no" }
                );
            }
        }
        Command::EncodeWif { key, uncompressed } => {
            let key = zeroize::Zeroizing::new(hex::decode(key.trim())?);
            let wif = Wif::new(&key, &network, !uncompressed)?;
            println!("{}", wif);
        }
        Command::DecodeWif { wif } => {
            let wif = Wif::decode(wif.trim())?;
            let info = WifInfo::new(&wif, &registry);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Decoded private key:");
                println!("Network: {}", info.network.as_deref().unwrap_or("unknown"));
                println!("Version byte: 0x{:02x}", info.version_byte);
                println!("Compressed: {}", info.compressed);
                match &info.pub_key {
                    Some(pub_key) => println!("Public key: {}", pub_key),
                    None => println!("Public key: invalid secp256k1 scalar"),
                }
            }
        }
        Command::Networks => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(registry.networks())?);
            } else {
                for params in registry.iter() {
                    println!(
                        "{:<10} magic 0x{:08x}  pkh 0x{:02x}  sh 0x{:02x}  wif 0x{:02x}  hrp {}",
                        params.name(),
                        params.net,
                        params.pub_key_hash_addr_id,
                        params.script_hash_addr_id,
                        params.private_key_id,
                        params.hrp()
                    );
                }
            }
        }
    }

    Ok(())
}
