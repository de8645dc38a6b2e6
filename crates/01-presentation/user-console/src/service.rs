//! 用户信息展示服务

use crate::bean::SharedUserConfig;
use infrastructure_common::Component;
use std::io::{self, Write};
use tracing::error;

/// 用户信息展示服务
///
/// 构造时注入用户配置，之后只读取不修改。
#[derive(Debug, Clone)]
pub struct UserService {
    user_config: SharedUserConfig,
}

impl UserService {
    pub fn new(user_config: SharedUserConfig) -> Self {
        Self { user_config }
    }

    /// 将用户信息写入任意输出，固定两行：`Name: ...` 与 `Class: ...`
    pub fn write_user_details<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let config = self.user_config.read();
        writeln!(out, "Name: {}", config.name)?;
        writeln!(out, "Class: {}", config.class_name)?;
        Ok(())
    }

    /// 将用户信息打印到标准输出
    pub fn print_user_details(&self) {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        if let Err(e) = self.write_user_details(&mut out).and_then(|()| out.flush()) {
            error!("输出用户信息失败: {}", e);
        }
    }
}

impl Component for UserService {
    fn name(&self) -> &'static str {
        "userService"
    }
}
