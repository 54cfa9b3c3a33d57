//! CLI argument parsing with clap

use clap::Parser;

/// vitewind - create a Vite + React project with Tailwind CSS preconfigured
#[derive(Parser, Debug)]
#[command(name = "vitewind")]
#[command(author, version, about)]
#[command(long_about = r#"Create a Vite + React project with Tailwind CSS preconfigured.

Asks for a project name, then:
  1. runs create-vite with the react template
  2. installs dependencies
  3. installs tailwindcss and @tailwindcss/vite
  4. adds the Tailwind plugin to vite.config.js
  5. replaces src/index.css and src/App.css with the Tailwind import
  6. prints the next steps

Environment:
  VITEWIND_PACKAGE_MANAGER   npm (default), pnpm, yarn or bun
  VITEWIND_TEMPLATE          create-vite template (default: react)
  VITEWIND_NO_COLOR          set to true to disable colors
  VITEWIND_LOG               log filter, e.g. debug"#)]
pub struct Cli {}
