//! Static wording tables for explanations.
//!
//! Templates may contain `{language}` and `{filename}` placeholders,
//! filled in by [`fill`].

use crate::language::Language;
use crate::parser::DeclarationKind;

use super::FileRole;

/// Connections slot text when a file imports nothing.
pub const NO_CONNECTIONS: &str =
    "This file does not bring in any other files or libraries, so it works on its own.";

/// Most steps listed one by one before switching to a per-kind summary.
pub const MAX_STEPS: usize = 8;

/// Longest leading-comment excerpt quoted in a step.
pub const MAX_NOTE_LEN: usize = 80;

/// Most declaration names quoted in a per-kind summary step.
pub const MAX_SUMMARY_NAMES: usize = 3;

pub fn fill(template: &str, language: &str, filename: &str) -> String {
    template
        .replace("{language}", language)
        .replace("{filename}", filename)
}

pub fn purpose(role: FileRole) -> &'static str {
    match role {
        FileRole::GenericFile => {
            "This is a file called \"{filename}\" written in {language}. It could not be read as a program, so it is described in general terms."
        }
        FileRole::Test => {
            "This is a {language} test file called \"{filename}\". It runs other parts of the program and checks that they behave as expected."
        }
        FileRole::Configuration => {
            "This is a configuration file called \"{filename}\". It's like the settings menu for the program: it tells the program how to behave."
        }
        FileRole::EntryPoint => {
            "This is the main {language} file called \"{filename}\". When the program runs, this is where it starts."
        }
        FileRole::Utility => {
            "This is a {language} helper file called \"{filename}\". It gathers small, handy tools that make common tasks easier."
        }
        FileRole::DataModel => {
            "This is a {language} file called \"{filename}\" that describes how data is organised. It holds blueprints the rest of the program fills in."
        }
        FileRole::Library => {
            "This is a {language} module called \"{filename}\". Think of it like a toolbox full of functions that other parts of the program can use."
        }
        FileRole::Script => {
            "This is a {language} script called \"{filename}\". It's like a recipe that tells the computer to do a specific task from top to bottom."
        }
    }
}

pub fn rationale(role: FileRole) -> &'static str {
    match role {
        FileRole::GenericFile => {
            "Projects often carry files that support the code without being code themselves, such as notes, data or build helpers."
        }
        FileRole::Test => {
            "Tests are like a practice exam before the real one: they catch mistakes early, so changes can be made with confidence."
        }
        FileRole::Configuration => {
            "Keeping settings in their own file means the program's behaviour can be changed without touching the code itself."
        }
        FileRole::EntryPoint => {
            "Every program needs a front door. This file wires the other pieces together and starts the work."
        }
        FileRole::Utility => {
            "Small jobs that many parts of the program need are collected here, so they are written once instead of over and over."
        }
        FileRole::DataModel => {
            "Describing the shape of data in one place keeps every part of the program in agreement about what information looks like."
        }
        FileRole::Library => {
            "Grouping related functions in one module lets other files borrow them instead of repeating the same work."
        }
        FileRole::Script => {
            "Some tasks are simple enough to be written as a straight list of instructions, and this file is one of them."
        }
    }
}

/// Steps used when a file declares nothing.
pub fn fallback_steps(role: FileRole) -> &'static [&'static str] {
    match role {
        FileRole::GenericFile => &[
            "The file is read as plain text.",
            "Its contents are used by other tools or by people, not run directly.",
        ],
        FileRole::Test => &[
            "The test runner loads this file.",
            "Each check prepares some input and runs a piece of the program.",
            "The result is compared with what was expected.",
        ],
        FileRole::Configuration => &[
            "The program reads this file when it starts.",
            "It picks up the settings and preferences written here.",
            "Those settings control how the program behaves.",
        ],
        FileRole::EntryPoint => &[
            "The program starts and loads the tools it needs.",
            "It reads any input or settings.",
            "It performs the main task.",
            "It shows the results or saves them somewhere.",
        ],
        FileRole::Utility | FileRole::Library => &[
            "Other files load this one to use its tools.",
            "Each tool does a specific job and hands back a result.",
        ],
        FileRole::DataModel => &[
            "The file describes what pieces of information belong together.",
            "Other files create and fill in those shapes.",
        ],
        FileRole::Script => &[
            "The computer reads the instructions from top to bottom.",
            "Each line happens in order, like following a recipe.",
        ],
    }
}

pub fn input_fallback(role: FileRole) -> &'static str {
    match role {
        FileRole::GenericFile => "Nothing is read while running; the file itself is the information.",
        FileRole::Test => "The sample data written inside the tests.",
        FileRole::Configuration => "The values typed into this file by whoever set up the program.",
        FileRole::EntryPoint => "Whatever the user or the rest of the program hands it when it starts.",
        FileRole::Utility | FileRole::Library => "The values passed in by the parts of the program that call its functions.",
        FileRole::DataModel => "The information other parts of the program store in its blueprints.",
        FileRole::Script => "The values written directly in the script.",
    }
}

pub fn output_fallback(role: FileRole) -> &'static str {
    match role {
        FileRole::GenericFile => "Nothing is produced; other tools or people read the file as it is.",
        FileRole::Test => "A pass or fail result for each check, reported by the test runner.",
        FileRole::Configuration => "Settings handed to the program that reads this file.",
        FileRole::EntryPoint => "Results handed back to the user or passed on to other parts of the program.",
        FileRole::Utility | FileRole::Library => "Results returned to whichever part of the program called its functions.",
        FileRole::DataModel => "Organised records the rest of the program can work with.",
        FileRole::Script => "Whatever the script's last steps produce.",
    }
}

pub fn tips(role: FileRole) -> &'static [&'static str] {
    match role {
        FileRole::GenericFile => &[
            "Not every file in a project is code. Open it in a text editor and skim it; the name often explains its job.",
            "If you are unsure what a file is for, search the project for its name to see who uses it.",
        ],
        FileRole::Test => &[
            "Reading tests is a great way to learn what the code is supposed to do, because each test shows an example.",
            "Try changing an expected value in a test and run it again: watching it fail teaches you what it checks.",
            "Test names usually describe a behaviour in plain words. Start by reading just the names.",
        ],
        FileRole::Configuration => &[
            "Configuration files are usually safe to change. Just keep a backup copy first!",
            "Change one setting at a time and rerun the program, so you know which change did what.",
        ],
        FileRole::EntryPoint => &[
            "This is where the action starts! Try running the program and follow along with this file.",
            "Follow the function calls from here one at a time to discover how the rest of the program fits together.",
        ],
        FileRole::Utility => &[
            "Helpers are small on purpose. Pick one, read it, and then search for where it is used.",
            "When a helper's name is clear, you can trust it and skip its details on a first read.",
        ],
        FileRole::DataModel => &[
            "Sketch each blueprint on paper as a box with its fields listed inside. It makes the data much easier to picture.",
            "Look for where these blueprints are created in other files to see real examples of the data.",
        ],
        FileRole::Library => &[
            "Don't worry about understanding everything at once. Focus on what each function does, not how it does it.",
            "Read the function names and their inputs first; together they tell you most of the story.",
            "Pick the shortest function and read it completely. Small wins build confidence.",
        ],
        FileRole::Script => &[
            "Start by reading the code from top to bottom. Each line happens in order, like following a recipe.",
            "Add a print statement between steps to watch the script work as it runs.",
        ],
    }
}

pub fn language_fact(language: Language) -> &'static str {
    match language {
        Language::Python => "It's written in Python, a language known for being beginner-friendly.",
        Language::JavaScript => "It's written in JavaScript, the language that runs inside web browsers.",
        Language::TypeScript => "It's written in TypeScript, which is JavaScript with labels that say what kind of data each value holds.",
        Language::Java => "It's written in Java, used for many large business applications and Android apps.",
        Language::Kotlin => "It's written in Kotlin, a modern language popular for Android apps.",
        Language::Scala => "It's written in Scala, a language that mixes object-oriented and functional styles.",
        Language::Swift => "It's written in Swift, the language Apple uses for iPhone and Mac apps.",
        Language::C => "It's written in C, an older language that works very close to the hardware.",
        Language::Cpp => "It's written in C++, a fast language often used for games and performance-heavy software.",
        Language::Go => "It's written in Go, a language designed for simple, fast network services.",
        Language::Rust => "It's written in Rust, a language that checks memory safety before the program runs.",
        Language::Ruby => "It's written in Ruby, a language designed to be pleasant to read and write.",
        Language::Php => "It's written in PHP, commonly used to build websites on the server.",
        Language::Shell => "It's a shell script, a list of commands a terminal runs one after another.",
        Language::Json => "It's written in JSON, a simple format for storing data as labelled values.",
        Language::Yaml => "It's written in YAML, a data format that uses indentation to show structure.",
        Language::Unknown => "Its language could not be recognised, so it is described in general terms.",
    }
}

/// Plural noun used when summarising many declarations of one kind.
pub fn kind_plural(kind: DeclarationKind) -> &'static str {
    match kind {
        DeclarationKind::Function => "functions",
        DeclarationKind::Method => "methods",
        DeclarationKind::Class => "classes",
        DeclarationKind::Type => "types",
        DeclarationKind::Constant => "constants",
    }
}

pub fn kind_singular(kind: DeclarationKind) -> &'static str {
    match kind {
        DeclarationKind::Function => "function",
        DeclarationKind::Method => "method",
        DeclarationKind::Class => "class",
        DeclarationKind::Type => "type",
        DeclarationKind::Constant => "constant",
    }
}

/// Where a cue points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// A recognisable source or destination of data.
pub struct Cue {
    pub direction: Direction,
    pub description: &'static str,
    /// Callee names, matched against the whole callee or its last segments.
    pub calls: &'static [&'static str],
    /// Import targets, matched against the whole target or its leading segments.
    pub imports: &'static [&'static str],
}

const FILE_IMPORTS: &[&str] = &[
    "fs", "node:fs", "fs/promises", "std::fs", "java.io", "java.nio", "io/ioutil", "pathlib",
    "shutil", "csv", "fstream", "fstream.h", "stdio.h",
];

const NETWORK_IMPORTS: &[&str] = &[
    "requests", "urllib", "http", "httpx", "aiohttp", "socket", "net/http", "net", "axios",
    "reqwest", "hyper", "java.net", "okhttp3", "Alamofire", "URLSession", "sys/socket.h",
];

pub static CUES: &[Cue] = &[
    Cue {
        direction: Direction::Input,
        description: "Text typed by the user in the console",
        calls: &[
            "input", "raw_input", "readline", "read_line", "scanf", "gets", "fgets", "getline",
            "prompt", "nextLine", "readLine", "Scanln",
        ],
        imports: &["readline", "java.util.Scanner", "getpass"],
    },
    Cue {
        direction: Direction::Input,
        description: "Files stored on the computer",
        calls: &[
            "open", "read", "read_to_string", "readFile", "readFileSync", "fopen", "fread",
            "ReadFile", "readlines", "read_text", "load", "read_csv", "File.read",
        ],
        imports: FILE_IMPORTS,
    },
    Cue {
        direction: Direction::Input,
        description: "The internet, through web requests or network connections",
        calls: &["fetch", "urlopen", "recv", "accept", "http.Get", "requests.get", "axios.get"],
        imports: NETWORK_IMPORTS,
    },
    Cue {
        direction: Direction::Input,
        description: "A database",
        calls: &["execute", "query", "fetchall", "fetchone", "cursor", "find_one", "QueryRow"],
        imports: &[
            "sqlite3", "psycopg2", "sqlalchemy", "pymongo", "mysql", "database/sql", "java.sql",
            "diesel", "sqlx", "rusqlite", "mongoose", "redis", "pg", "sequelize",
        ],
    },
    Cue {
        direction: Direction::Input,
        description: "Environment variables set outside the program",
        calls: &["getenv", "os.environ.get", "environ.get", "env::var", "env.var", "Getenv", "System.getenv"],
        imports: &["dotenv", "python-dotenv"],
    },
    Cue {
        direction: Direction::Input,
        description: "Command-line arguments given when the program starts",
        calls: &["parse_args", "getopt", "flag.Parse", "env::args", "args", "ArgumentParser", "CommandLine.arguments"],
        imports: &["argparse", "optparse", "click", "typer", "clap", "commander", "yargs", "flag", "getopt", "picocli"],
    },
    Cue {
        direction: Direction::Output,
        description: "Messages printed to the console",
        calls: &[
            "print", "println", "printf", "puts", "console.log", "console.error", "echo",
            "fmt.Println", "fmt.Printf", "System.out.println", "eprintln", "cout", "NSLog",
        ],
        imports: &["iostream", "rich", "colorama"],
    },
    Cue {
        direction: Direction::Output,
        description: "Files saved on the computer",
        calls: &[
            "write", "write_all", "writeFile", "writeFileSync", "fwrite", "fputs", "dump",
            "save", "WriteFile", "to_csv", "savefig", "write_text", "writelines", "File.write",
        ],
        imports: FILE_IMPORTS,
    },
    Cue {
        direction: Direction::Output,
        description: "Log records that track what the program did",
        calls: &["getLogger", "logger.info", "logger.warning", "logger.error", "logging.info", "log.Printf", "log.Println"],
        imports: &["logging", "log", "tracing", "loguru", "winston", "org.slf4j", "org.apache.logging.log4j", "java.util.logging"],
    },
    Cue {
        direction: Direction::Output,
        description: "The internet, by sending requests or responses",
        calls: &["send", "sendall", "post", "emit", "respond", "requests.post", "axios.post", "http.Post"],
        imports: NETWORK_IMPORTS,
    },
    Cue {
        direction: Direction::Output,
        description: "A database",
        calls: &["commit", "insert", "insert_one", "save_all", "executemany"],
        imports: &[],
    },
];

/// Imports that mark a file as a test suite.
pub const TEST_FRAMEWORKS: &[&str] = &[
    "pytest", "unittest", "nose", "hypothesis", "org.junit", "junit", "org.testng", "testing",
    "jest", "mocha", "chai", "vitest", "@jest/globals", "@testing-library", "XCTest",
    "org.scalatest", "munit", "gtest/gtest.h", "catch2/catch.hpp", "check.h", "kotlin.test",
];

/// Filename words (lowercase) that mark configuration.
pub const CONFIG_WORDS: &[&str] = &["config", "configuration", "settings", "conf"];

/// Filename stems that mark an entry point.
pub const ENTRY_STEMS: &[&str] = &["main", "__main__", "index"];

/// Filename words (lowercase) that mark helper modules.
pub const UTILITY_WORDS: &[&str] = &["util", "utils", "helper", "helpers", "tool", "tools"];
