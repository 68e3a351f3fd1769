// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

//! The remaining single-operand and list-operand instruction forms:
//! `EXPOSE`, `WORKDIR`, `USER`, `VOLUME`, `SHELL`, and `STOPSIGNAL`.

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::util::{is_exec_form, parse_exec_form, split_words};

/// A Dockerfile [`EXPOSE` instruction][expose].
///
/// [expose]: https://docs.docker.com/engine/reference/builder/#expose
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExposeInstruction {
  pub line: usize,
  pub raw: String,

  pub ports: Vec<String>
}

impl ExposeInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<ExposeInstruction> {
    Ok(ExposeInstruction {
      line,
      raw: raw.to_string(),
      ports: split_words(args)
    })
  }
}

impl fmt::Display for ExposeInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.ports.is_empty() {
      write!(f, "EXPOSE")
    } else {
      write!(f, "EXPOSE {}", self.ports.join(" "))
    }
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a ExposeInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Expose(e) = instruction {
      Ok(e)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "ExposeInstruction".into()
      })
    }
  }
}

/// A Dockerfile [`WORKDIR` instruction][workdir].
///
/// [workdir]: https://docs.docker.com/engine/reference/builder/#workdir
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct WorkdirInstruction {
  pub line: usize,
  pub raw: String,

  pub path: String
}

impl WorkdirInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<WorkdirInstruction> {
    if args.is_empty() {
      return Err(parse_error(line, "WORKDIR requires a path"));
    }

    Ok(WorkdirInstruction {
      line,
      raw: raw.to_string(),
      path: args.to_string()
    })
  }
}

impl fmt::Display for WorkdirInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "WORKDIR {}", self.path)
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a WorkdirInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Workdir(w) = instruction {
      Ok(w)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "WorkdirInstruction".into()
      })
    }
  }
}

/// A Dockerfile [`USER` instruction][user].
///
/// [user]: https://docs.docker.com/engine/reference/builder/#user
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UserInstruction {
  pub line: usize,
  pub raw: String,

  pub user: String,
  pub group: Option<String>
}

impl UserInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<UserInstruction> {
    if args.is_empty() {
      return Err(parse_error(line, "USER requires a user"));
    }

    let (user, group) = match args.find(':') {
      Some(colon) => (
        args[..colon].to_string(),
        Some(args[colon + 1..].to_string())
      ),
      None => (args.to_string(), None)
    };

    Ok(UserInstruction {
      line,
      raw: raw.to_string(),
      user, group
    })
  }
}

impl fmt::Display for UserInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.group {
      Some(group) => write!(f, "USER {}:{}", self.user, group),
      None => write!(f, "USER {}", self.user)
    }
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a UserInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::User(u) = instruction {
      Ok(u)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "UserInstruction".into()
      })
    }
  }
}

/// A Dockerfile [`VOLUME` instruction][volume].
///
/// [volume]: https://docs.docker.com/engine/reference/builder/#volume
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VolumeInstruction {
  pub line: usize,
  pub raw: String,

  pub paths: Vec<String>
}

impl VolumeInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<VolumeInstruction> {
    let paths = if is_exec_form(args) {
      parse_exec_form(args)
    } else {
      split_words(args)
    };

    Ok(VolumeInstruction {
      line,
      raw: raw.to_string(),
      paths
    })
  }
}

impl fmt::Display for VolumeInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.paths.is_empty() {
      return write!(f, "VOLUME");
    }

    let json = serde_json::to_string(&self.paths)
      .unwrap_or_else(|_| self.paths.join(" "));
    write!(f, "VOLUME {}", json)
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a VolumeInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Volume(v) = instruction {
      Ok(v)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "VolumeInstruction".into()
      })
    }
  }
}

/// A Dockerfile [`SHELL` instruction][shell].
///
/// [shell]: https://docs.docker.com/engine/reference/builder/#shell
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ShellInstruction {
  pub line: usize,
  pub raw: String,

  pub shell: Vec<String>
}

impl ShellInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<ShellInstruction> {
    let shell = if is_exec_form(args) {
      parse_exec_form(args)
    } else {
      split_words(args)
    };

    Ok(ShellInstruction {
      line,
      raw: raw.to_string(),
      shell
    })
  }
}

impl fmt::Display for ShellInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.shell.is_empty() {
      return write!(f, "SHELL");
    }

    let json = serde_json::to_string(&self.shell)
      .unwrap_or_else(|_| self.shell.join(" "));
    write!(f, "SHELL {}", json)
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a ShellInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Shell(s) = instruction {
      Ok(s)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "ShellInstruction".into()
      })
    }
  }
}

/// A Dockerfile [`STOPSIGNAL` instruction][stopsignal].
///
/// [stopsignal]: https://docs.docker.com/engine/reference/builder/#stopsignal
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct StopsignalInstruction {
  pub line: usize,
  pub raw: String,

  pub signal: String
}

impl StopsignalInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<StopsignalInstruction> {
    if args.is_empty() {
      return Err(parse_error(line, "STOPSIGNAL requires a signal"));
    }

    Ok(StopsignalInstruction {
      line,
      raw: raw.to_string(),
      signal: args.to_string()
    })
  }
}

impl fmt::Display for StopsignalInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "STOPSIGNAL {}", self.signal)
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a StopsignalInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Stopsignal(s) = instruction {
      Ok(s)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "StopsignalInstruction".into()
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn strings(strs: &[&str]) -> Vec<String> {
    strs.iter().map(|s| String::from(*s)).collect()
  }

  #[test]
  fn expose_ports() -> Result<()> {
    let expose = ExposeInstruction::parse(1, "EXPOSE 80 443/tcp", "80 443/tcp")?;
    assert_eq!(expose.ports, strings(&["80", "443/tcp"]));

    // empty is allowed
    let expose = ExposeInstruction::parse(1, "EXPOSE", "")?;
    assert_eq!(expose.ports, Vec::<String>::new());

    Ok(())
  }

  #[test]
  fn workdir_path() -> Result<()> {
    let workdir = WorkdirInstruction::parse(1, "WORKDIR /app", "/app")?;
    assert_eq!(workdir.path, "/app");

    assert!(WorkdirInstruction::parse(1, "WORKDIR", "").is_err());

    Ok(())
  }

  #[test]
  fn user_with_group() -> Result<()> {
    let user = UserInstruction::parse(1, "USER app:wheel", "app:wheel")?;
    assert_eq!(user.user, "app");
    assert_eq!(user.group, Some("wheel".into()));

    let user = UserInstruction::parse(1, "USER nobody", "nobody")?;
    assert_eq!(user.user, "nobody");
    assert_eq!(user.group, None);

    assert!(UserInstruction::parse(1, "USER", "").is_err());

    Ok(())
  }

  #[test]
  fn volume_forms() -> Result<()> {
    let json_form = VolumeInstruction::parse(1, r#"VOLUME ["/data", "/logs"]"#, r#"["/data", "/logs"]"#)?;
    assert_eq!(json_form.paths, strings(&["/data", "/logs"]));

    let shell_form = VolumeInstruction::parse(1, "VOLUME /data /logs", "/data /logs")?;
    assert_eq!(shell_form.paths, strings(&["/data", "/logs"]));

    Ok(())
  }

  #[test]
  fn shell_forms() -> Result<()> {
    let exec = ShellInstruction::parse(
      1,
      r#"SHELL ["powershell", "-command"]"#,
      r#"["powershell", "-command"]"#
    )?;
    assert_eq!(exec.shell, strings(&["powershell", "-command"]));

    let words = ShellInstruction::parse(1, "SHELL /bin/sh -c", "/bin/sh -c")?;
    assert_eq!(words.shell, strings(&["/bin/sh", "-c"]));

    Ok(())
  }

  #[test]
  fn stopsignal_signal() -> Result<()> {
    let stop = StopsignalInstruction::parse(1, "STOPSIGNAL SIGTERM", "SIGTERM")?;
    assert_eq!(stop.signal, "SIGTERM");

    assert!(StopsignalInstruction::parse(1, "STOPSIGNAL", "").is_err());

    Ok(())
  }

  #[test]
  fn volume_display_uses_json() -> Result<()> {
    let volume = VolumeInstruction::parse(1, "VOLUME /data /logs", "/data /logs")?;
    assert_eq!(volume.to_string(), r#"VOLUME ["/data","/logs"]"#);

    Ok(())
  }
}
