use super::{EvalError, Object, ObjectMethod, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};

#[derive(Debug)]
pub struct FileObject {
    pub filename: String,
    pub position: i64,
    handle: Handle,
}

#[derive(Debug)]
enum Handle {
    Closed,
    File(std::fs::File),
    Stdin,
    Stdout,
    Stderr,
}

fn invalid_handle() -> EvalError {
    EvalError::Custom {
        message: "Invalid file handle.".to_owned(),
    }
}

fn io_error(err: std::io::Error) -> EvalError {
    EvalError::IoError {
        message: err.to_string(),
    }
}

impl FileObject {
    /// Opens a file with one of the mode strings `r`, `w`, `wa`, `rw` or
    /// `rwa`. Write modes create the file with the given permission, a
    /// decimal string interpreted as POSIX mode bits. The sentinel names
    /// `!STDIN!`, `!STDOUT!` and `!STDERR!` bind the standard streams.
    pub fn open(filename: &str, mode: &str, perm: &str) -> Result<Self> {
        let handle = match filename {
            "!STDIN!" => Handle::Stdin,
            "!STDOUT!" => Handle::Stdout,
            "!STDERR!" => Handle::Stderr,
            _ => {
                let mut options = OpenOptions::new();
                match mode {
                    "r" => options.read(true),
                    "w" => options.write(true),
                    "wa" => options.write(true).append(true),
                    "rw" => options.read(true).write(true),
                    "rwa" => options.read(true).write(true).append(true),
                    other => {
                        return Err(EvalError::InvalidFileMode {
                            mode: other.to_owned(),
                        })
                    }
                };

                if mode != "r" {
                    options.create(true);
                    let bits: u32 = perm.parse().map_err(|_| EvalError::IoError {
                        message: format!("invalid file permission `{}`", perm),
                    })?;
                    #[cfg(unix)]
                    {
                        use std::os::unix::fs::OpenOptionsExt;
                        options.mode(bits);
                    }
                    #[cfg(not(unix))]
                    let _ = bits;
                }

                Handle::File(options.open(filename).map_err(io_error)?)
            }
        };

        Ok(Self {
            filename: filename.to_owned(),
            position: 0,
            handle,
        })
    }

    fn close(&mut self) {
        self.handle = Handle::Closed;
        self.position = -1;
    }

    // Reads the whole file and rewinds to the start.
    fn read_all(&mut self) -> Result<String> {
        let file = match &mut self.handle {
            Handle::File(file) => file,
            _ => return Err(invalid_handle()),
        };

        file.seek(SeekFrom::Start(0)).map_err(io_error)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).map_err(io_error)?;
        file.seek(SeekFrom::Start(0)).map_err(io_error)?;
        self.position = 0;

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn read(&mut self, amount: i64) -> Result<String> {
        let mut buffer = vec![0u8; amount.max(0) as usize];
        let read = match &mut self.handle {
            Handle::File(file) => file.read(&mut buffer),
            Handle::Stdin => std::io::stdin().read(&mut buffer),
            _ => return Err(invalid_handle()),
        }
        .map_err(io_error)?;

        self.position += read as i64;

        if read == 0 && amount > 0 {
            return Err(EvalError::Custom {
                message: "EOF".to_owned(),
            });
        }

        buffer.truncate(read);
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn seek(&mut self, offset: i64, whence: i64) -> Result<i64> {
        let from = match whence {
            0 => SeekFrom::Start(offset.max(0) as u64),
            1 => SeekFrom::Current(offset),
            2 => SeekFrom::End(offset),
            other => {
                return Err(EvalError::Custom {
                    message: format!("invalid whence value `{}`", other),
                })
            }
        };

        let file = match &mut self.handle {
            Handle::File(file) => file,
            _ => return Err(invalid_handle()),
        };

        self.position = file.seek(from).map_err(io_error)? as i64;
        Ok(self.position)
    }

    fn write(&mut self, content: &str) -> Result<()> {
        let written = match &mut self.handle {
            Handle::File(file) => file.write(content.as_bytes()),
            Handle::Stdout => std::io::stdout().write(content.as_bytes()),
            Handle::Stderr => std::io::stderr().write(content.as_bytes()),
            _ => return Err(invalid_handle()),
        }
        .map_err(io_error)?;

        self.position += written as i64;
        Ok(())
    }
}

fn with_file<T>(
    receiver: &Object,
    method: &str,
    f: impl FnOnce(&mut FileObject) -> Result<T>,
) -> Result<T> {
    match receiver {
        Object::File(file) => f(&mut file.borrow_mut()),
        other => Err(EvalError::UndefinedMethod {
            method: method.to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn close(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_file(receiver, "close", |file| {
        file.close();
        Ok(Object::Boolean(true))
    })
}

fn position(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_file(receiver, "position", |file| Ok(Object::Integer(file.position)))
}

fn content(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_file(receiver, "content", |file| file.read_all().map(Object::from))
}

fn lines(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_file(receiver, "lines", |file| {
        let content = file.read_all()?;
        let lines: Vec<Object> = content.split('\n').map(Object::from).collect();

        Ok(Object::from(lines))
    })
}

fn read(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    let amount = match args.first() {
        Some(Object::Integer(n)) => *n,
        _ => 0,
    };

    with_file(receiver, "read", |file| file.read(amount).map(Object::from))
}

fn seek(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    let offset = match args.first() {
        Some(Object::Integer(n)) => *n,
        _ => 0,
    };
    let whence = match args.get(1) {
        Some(Object::Integer(n)) => *n,
        _ => 0,
    };

    with_file(receiver, "seek", |file| {
        file.seek(offset, whence).map(Object::Integer)
    })
}

fn write(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    let content = match args.first() {
        Some(Object::String(s)) => s.borrow().clone(),
        _ => String::new(),
    };

    with_file(receiver, "write", |file| {
        file.write(&content)?;
        Ok(Object::Boolean(true))
    })
}

lazy_static! {
    pub(super) static ref METHODS: HashMap<&'static str, ObjectMethod> = {
        let mut methods: HashMap<&'static str, ObjectMethod> = HashMap::new();
        methods.insert(
            "close",
            ObjectMethod {
                description: "Closes the file pointer. Returns always `true`.",
                arg_pattern: &[],
                return_pattern: &[&["BOOLEAN"]],
                args_optional: false,
                method: close,
            },
        );
        methods.insert(
            "position",
            ObjectMethod {
                description: "Returns the position of the file handle, -1 if closed.",
                arg_pattern: &[],
                return_pattern: &[&["INTEGER"]],
                args_optional: false,
                method: position,
            },
        );
        methods.insert(
            "content",
            ObjectMethod {
                description: "Reads the whole file and rewinds to position 0.",
                arg_pattern: &[],
                return_pattern: &[&["STRING", "ERROR"]],
                args_optional: false,
                method: content,
            },
        );
        methods.insert(
            "lines",
            ObjectMethod {
                description: "Returns the lines of the file and rewinds to position 0.",
                arg_pattern: &[],
                return_pattern: &[&["ARRAY", "ERROR"]],
                args_optional: false,
                method: lines,
            },
        );
        methods.insert(
            "read",
            ObjectMethod {
                description: "Reads up to the given amount of bytes and advances the position.",
                arg_pattern: &[&["INTEGER"]],
                return_pattern: &[&["STRING", "ERROR"]],
                args_optional: false,
                method: read,
            },
        );
        methods.insert(
            "seek",
            ObjectMethod {
                description: "Seeks to an offset relative to start (0), position (1) or end (2).",
                arg_pattern: &[&["INTEGER"], &["INTEGER"]],
                return_pattern: &[&["INTEGER", "ERROR"]],
                args_optional: false,
                method: seek,
            },
        );
        methods.insert(
            "write",
            ObjectMethod {
                description: "Writes the given string to the file. Returns `true` on success.",
                arg_pattern: &[&["STRING"]],
                return_pattern: &[&["BOOLEAN", "ERROR"]],
                args_optional: false,
                method: write,
            },
        );
        methods
    };
}
