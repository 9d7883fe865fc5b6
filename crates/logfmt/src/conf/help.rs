//! Help: the `--config-help` text and the header of generated config files.

/// First lines of a file written by `--init-config`.
pub const INIT_HEADER: &str = "\
# logfmt configuration
#
# Every setting below is the built-in default. Remove what you do not want
# to change. Run `logfmt --config-help` for a description of each option.
";

pub const CONFIG_HELP: &str = r##"Configuration Help for logfmt
=============================

logfmt reads settings from a .logfmt.toml file, LOGFMT_* environment
variables and command line flags. Later sources override earlier ones:

  defaults < config file < environment < command line

CONFIGURATION FILE LOCATIONS:
  1. $LOGFMT_CONFIG_FILE, when set
  2. .logfmt.toml in the current directory, then in each parent directory
  3. ~/.logfmt.toml

ENVIRONMENT VARIABLES:
  LOGFMT_OUTPUT_FILE, LOGFMT_APPEND_TO_FILE, LOGFMT_COLORIZE,
  LOGFMT_HIGHLIGHT_WORRY_WORDS, LOGFMT_EXPERIMENTAL_ACCESS_LOGS,
  LOGFMT_TIMESTAMP_FIELD, LOGFMT_MESSAGE_FIELD, LOGFMT_LEVEL_FIELD,
  LOGFMT_CALLER_FIELD, LOGFMT_MESSAGE_FORMAT, LOGFMT_SHOW_NULL,
  LOGFMT_STRIP_ANSI, LOGFMT_TRIM_FIELDS, LOGFMT_EXTRACT_FIELDS

  Booleans accept true/false, yes/no, on/off and 1/0.
  Field lists are comma separated: LOGFMT_TRIM_FIELDS=level,msg,host
  LOGFMT_LOG sets the diagnostic log filter (default: logfmt=warn).

CONFIGURATION OPTIONS:

Output Options:
  output_file = "-"                 # Output file ("-" for stdout)
  append_to_file = false            # Append to output file
  colorize = "auto"                 # Color mode: "auto", "on", "off"

Processing Options:
  highlight_worry_words = true      # Highlight error/warning keywords
  experimental_access_logs = false  # Enable Envoy/Istio access log parsing
  strip_ansi = true                 # Remove ANSI escapes before parsing
  show_null = false                 # Show null values in output

Field Configuration:
  timestamp_field = "ts"            # Timestamp field name
  message_field = "msg"             # Message field name
  level_field = "level"             # Log level field name
  caller_field = "caller"           # Caller info field name
  message_format = ""               # Message template, e.g. "{{logger}}: {{msg}}"
                                    # ({{field}}, {{.field}} or {{index . "a.b"}});
                                    # empty prints message_field

Field Arrays:
  trim_fields = ["level", "msg", "stacktrace", "error"]
                                    # Fields to remove from JSON output
  extract_fields = ["error", "stacktrace"]
                                    # Fields printed on their own lines

Custom Worry Words:
  [worries]                         # Replaces the built-in list when set
  info = ["invalid"]                # highlighted via worry-info
  warn = ["warning"]                # highlighted via worry-warn
  err = ["error", "failed"]         # highlighted via worry-err
  crit = ["fatal"]                  # highlighted via worry-crit

Custom Colors:
  [colors]                          # Override default color palette
  normal = "#dddddd"                # Normal text
  "date/time" = "#dddddd"           # Timestamp color
  level-debug = "#6666ff"           # DEBUG level
  level-info = "#14ffff"            # INFO level
  level-warn = "#ffff00"            # WARN level
  level-error = "#ffd700"           # ERROR level
  level-dpanic = "#ff5f00"          # DPANIC level
  level-fatal = "#ff0000"           # FATAL level
  message = "#ffffff"               # Log message text
  stacktrace = "#767676"            # Stack traces
  data = "#aaaaaa"                  # JSON data keys
  data-literal = "#888899"          # JSON values
  worry-info = "#14ffff"            # Worry words (info)
  worry-warn = "#ffff00"            # Worry words (warning)
  worry-err = "#ff0000"             # Worry words (error)
  worry-crit = "#ff5f00"            # Worry words (critical)
  extracted = "#ff9999"             # Extracted field content

COLOR FORMATS:
  - Hex: "#ff0000" or "ff0000"
  - RGB: "rgb(255,0,0)" or "255,0,0"

EXAMPLE CONFIGURATION FILE (.logfmt.toml):
  colorize = "on"
  timestamp_field = "timestamp"
  trim_fields = ["level", "msg"]

  [colors]
  level-error = "#ff0000"
  level-warn = "255,255,0"

INITIALIZATION:
  Create a default config file:
    logfmt --init-config                   # Creates ~/.logfmt.toml
    logfmt --init-config myproject.toml    # Creates myproject.toml
"##;
