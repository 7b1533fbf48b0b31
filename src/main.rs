use clap::Parser;
use dotenvy::dotenv;

use snaplink::config::{Cli, CliCommand, StaticConfig};
use snaplink::errors::SnaplinkError;
use snaplink::runtime::run_server;
use snaplink::system::logging::init_logging;

#[actix_web::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    // 子命令模式：打印示例配置后退出
    if let Some(CliCommand::InitConfig) = cli.command {
        print!("{}", StaticConfig::generate_sample_config());
        return;
    }

    // 加载静态配置（TOML + 环境变量）
    let config = StaticConfig::load(&cli.config);

    // 初始化日志系统，guard 必须存活到进程结束
    let _guard = init_logging(&config.logging);

    if let Err(e) = run_server(config).await {
        // 启动失败：域内错误用彩色格式提示，其余打印完整错误链
        match e.downcast_ref::<SnaplinkError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("[ERROR] {:#}", e),
        }
        std::process::exit(1);
    }
}
