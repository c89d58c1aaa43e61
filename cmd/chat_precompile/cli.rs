use bytes::Bytes;
use clap::{Parser as ClapParser, Subcommand as ClapSubcommand, ValueEnum};
use ethrex_chat_precompile::{
    ChatAssistant, OperationKind,
    abi::{self, decode_string_return},
    dispatch::{CHAT_BOOL_SIGNATURE, CHAT_SIGNATURE, CHAT_UINT_SIGNATURE},
    policy::CallMode,
    registry::{CHAT_ASSISTANT, execute_chat_precompile},
};
use eyre::{WrapErr, eyre};
use tracing::{Level, info};

pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

#[allow(clippy::upper_case_acronyms)]
#[derive(ClapParser)]
#[command(name = "chat-precompile", author, version = VERSION_STRING, about = "Encode, run and decode chat assistant precompile calls", long_about = None)]
pub struct CLI {
    #[arg(long = "log.level", default_value_t = Level::INFO, value_name = "LOG_LEVEL", global = true)]
    pub log_level: Level,
    #[command(subcommand)]
    pub command: Subcommand,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Method {
    Chat,
    ChatBool,
    ChatUint,
}

impl Method {
    fn signature(self) -> &'static str {
        match self {
            Method::Chat => CHAT_SIGNATURE,
            Method::ChatBool => CHAT_BOOL_SIGNATURE,
            Method::ChatUint => CHAT_UINT_SIGNATURE,
        }
    }
}

#[derive(ClapSubcommand)]
pub enum Subcommand {
    #[command(about = "Print the hex calldata for a chat assistant call")]
    Encode {
        system_prompt: String,
        message: String,
        #[arg(long, value_enum, default_value_t = Method::Chat)]
        method: Method,
    },
    #[command(
        about = "Run calldata against the precompile using CHAT_ASSISTANT_* settings from the environment"
    )]
    Call {
        #[arg(value_name = "HEX_CALLDATA")]
        calldata: String,
        #[arg(long = "static", help = "Enter through the static-call entry point")]
        is_static: bool,
        #[arg(long, default_value_t = 200_000)]
        gas: u64,
    },
    #[command(about = "Decode the return data of a `chat` call")]
    Decode {
        #[arg(value_name = "HEX_OUTPUT")]
        output: String,
    },
}

impl Subcommand {
    pub fn run(self) -> eyre::Result<()> {
        match self {
            Subcommand::Encode {
                system_prompt,
                message,
                method,
            } => {
                let selector = abi::compute_selector(method.signature());
                let calldata = abi::encode_calldata(
                    selector,
                    &[system_prompt.as_bytes(), message.as_bytes()],
                );
                println!("0x{}", hex::encode(calldata));
            }
            Subcommand::Call {
                calldata,
                is_static,
                gas,
            } => {
                let calldata = parse_hex(&calldata)?;
                let assistant = ChatAssistant::from_env()?;
                let kind = assistant.methods().lookup(&calldata)?;

                let mut gas_remaining = gas;
                let output = execute_chat_precompile(
                    &assistant,
                    CHAT_ASSISTANT.address,
                    &calldata,
                    &mut gas_remaining,
                    CallMode::from_is_static(is_static),
                )?;
                info!(
                    method = kind.name(),
                    gas_used = gas.saturating_sub(gas_remaining),
                    "Call finished"
                );

                println!("0x{}", hex::encode(&output));
                if kind == OperationKind::GenerateText {
                    print_string_return(&output)?;
                }
            }
            Subcommand::Decode { output } => {
                let output = parse_hex(&output)?;
                print_string_return(&output)?;
            }
        }
        Ok(())
    }
}

fn parse_hex(raw: &str) -> eyre::Result<Bytes> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits)
        .map(Bytes::from)
        .wrap_err_with(|| eyre!("'{raw}' is not valid hex"))
}

fn print_string_return(output: &[u8]) -> eyre::Result<()> {
    let text = decode_string_return(output)?;
    println!("{}", String::from_utf8_lossy(&text));
    Ok(())
}
